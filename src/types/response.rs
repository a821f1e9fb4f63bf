//! Response handed back to the caller.

use super::stats::TextStats;
use crate::error_code::ErrorClass;
use crate::style_guide::PolicyHit;
use crate::Error;
use serde::{Deserialize, Serialize};

/// Where the optimized text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseSource {
    Provider { model: String, endpoint: String },
    Cache,
    LocalFallback { reason: String },
}

/// Classified failure, rendered by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub class: ErrorClass,
    pub code: String,
    pub message: String,
    pub remedy: String,
}

impl From<&Error> for ErrorInfo {
    fn from(err: &Error) -> Self {
        let class = err.class();
        Self {
            class,
            code: class.code().to_string(),
            message: class.friendly_message().to_string(),
            remedy: class.remedy().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TextStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ResponseSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_hits: Vec<PolicyHit>,
}

impl OptimizeResponse {
    pub fn success(original: &str, optimized: impl Into<String>, source: ResponseSource) -> Self {
        let optimized = optimized.into();
        Self {
            success: true,
            stats: Some(TextStats::compute(original, &optimized)),
            optimized_text: Some(optimized),
            source: Some(source),
            ..Default::default()
        }
    }

    pub fn failure(err: &Error) -> Self {
        Self {
            success: false,
            error: Some(ErrorInfo::from(err)),
            details: Some(err.to_string()),
            ..Default::default()
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_policy_hits(mut self, hits: Vec<PolicyHit>) -> Self {
        self.policy_hits = hits;
        self
    }

    /// A copy served from the cache.
    pub(crate) fn as_cached(&self) -> Self {
        Self {
            source: Some(ResponseSource::Cache),
            ..self.clone()
        }
    }

    pub fn error_class(&self) -> Option<ErrorClass> {
        self.error.as_ref().map(|e| e.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serializes_camel_case() {
        let resp = OptimizeResponse::success(
            "abc",
            "abcd",
            ResponseSource::LocalFallback {
                reason: "unconfigured".into(),
            },
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["optimizedText"], "abcd");
        assert_eq!(json["stats"]["originalLength"], 3);
        assert_eq!(json["source"]["kind"], "local_fallback");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_carries_classification() {
        let err = Error::Auth {
            status: 401,
            message: "bad key".into(),
        };
        let resp = OptimizeResponse::failure(&err);
        assert!(!resp.success);
        assert_eq!(resp.error_class(), Some(ErrorClass::Authentication));
        assert!(resp.details.unwrap().contains("bad key"));
    }
}
