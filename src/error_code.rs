//! 错误分类：定义客户端的标准错误类别及其重试语义与用户提示。
//!
//! Error classification for the optimization client.
//!
//! Every [`Error`](crate::Error) maps to exactly one [`ErrorClass`]. The class decides
//! whether the scheduler may re-enqueue a request and carries the friendly message and
//! remedy that the UI layer shows to the user.
//!
//! ## Error Code Categories
//!
//! | Prefix | Category    | Description                          |
//! |--------|-------------|--------------------------------------|
//! | E1xxx  | client      | Configuration, credentials, input    |
//! | E2xxx  | rate        | Upstream rate limiting               |
//! | E3xxx  | server      | Provider-side and transport failures |
//! | E4xxx  | operational | Local queue and lifecycle            |
//! | E9xxx  | unknown     | Catch-all / unclassified             |
//!
//! ## Example
//!
//! ```rust
//! use ai_polish::error_code::ErrorClass;
//!
//! let class = ErrorClass::from_http_status(429);
//! assert_eq!(class.code(), "E2001");
//! assert!(class.retryable());
//! assert_eq!(class.category(), "rate");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a failed optimization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// E1001: Credentials absent or malformed (routes to the local fallback, never surfaced)
    Configuration,
    /// E1002: Provider rejected the API key (401/403)
    Authentication,
    /// E1003: Candidate text rejected by the validator (replaced by the local fallback)
    Validation,
    /// E1004: Endpoint or model does not exist (404)
    NotFound,
    /// E2001: Provider rate limit exceeded on every model
    RateLimited,
    /// E3001: Provider returned a 5xx status
    ServerError,
    /// E3002: Connection failed before a response arrived
    Network,
    /// E3003: Provider call exceeded its deadline
    Timeout,
    /// E3004: 2xx response without usable text
    InvalidResponse,
    /// E4001: Local request queue is at capacity
    QueueFull,
    /// E4002: Client was dropped before the request resolved
    Shutdown,
    /// E9999: Error could not be classified
    Unknown,
}

impl ErrorClass {
    /// Returns the canonical code string (e.g., `"E1002"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration => "E1001",
            Self::Authentication => "E1002",
            Self::Validation => "E1003",
            Self::NotFound => "E1004",
            Self::RateLimited => "E2001",
            Self::ServerError => "E3001",
            Self::Network => "E3002",
            Self::Timeout => "E3003",
            Self::InvalidResponse => "E3004",
            Self::QueueFull => "E4001",
            Self::Shutdown => "E4002",
            Self::Unknown => "E9999",
        }
    }

    /// Returns the standard name (e.g., `"rate_limited"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::InvalidResponse => "invalid_response",
            Self::QueueFull => "queue_full",
            Self::Shutdown => "shutdown",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the scheduler may re-enqueue a request that failed with this class.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::Network | Self::Timeout
        )
    }

    /// Returns the category string.
    pub fn category(&self) -> &'static str {
        match self.code().as_bytes()[1] {
            b'1' => "client",
            b'2' => "rate",
            b'3' => "server",
            b'4' => "operational",
            _ => "unknown",
        }
    }

    /// Short message suitable for a popup.
    pub fn friendly_message(&self) -> &'static str {
        match self {
            Self::Configuration => "No API key configured; a local rewrite was used instead.",
            Self::Authentication => "The API key was rejected by the provider.",
            Self::Validation => "The provider returned an unusable rewrite.",
            Self::NotFound => "The configured API endpoint could not be found.",
            Self::RateLimited => "The provider is rate limiting requests.",
            Self::ServerError => "The provider is having problems right now.",
            Self::Network => "Could not reach the provider.",
            Self::Timeout => "The provider took too long to answer.",
            Self::InvalidResponse => "The provider answered without any text.",
            Self::QueueFull => "Too many rewrites are waiting.",
            Self::Shutdown => "The rewrite service stopped before finishing.",
            Self::Unknown => "Something went wrong.",
        }
    }

    /// Suggested remedy shown next to the friendly message.
    pub fn remedy(&self) -> &'static str {
        match self {
            Self::Configuration | Self::Authentication => {
                "Open the settings page and check the API key and base URL."
            }
            Self::NotFound => "Open the settings page and check the base URL.",
            Self::RateLimited | Self::QueueFull => "Wait a moment and try again.",
            Self::Network => "Check your network connection and try again.",
            Self::Timeout | Self::ServerError | Self::InvalidResponse => "Try again later.",
            Self::Validation | Self::Shutdown | Self::Unknown => "Try again.",
        }
    }

    /// Classify an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_classification() {
        assert_eq!(ErrorClass::from_http_status(401), ErrorClass::Authentication);
        assert_eq!(ErrorClass::from_http_status(403), ErrorClass::Authentication);
        assert_eq!(ErrorClass::from_http_status(404), ErrorClass::NotFound);
        assert_eq!(ErrorClass::from_http_status(429), ErrorClass::RateLimited);
        assert_eq!(ErrorClass::from_http_status(502), ErrorClass::ServerError);
        assert_eq!(ErrorClass::from_http_status(418), ErrorClass::Unknown);
    }

    #[test]
    fn test_retryable_classes() {
        for class in [
            ErrorClass::RateLimited,
            ErrorClass::ServerError,
            ErrorClass::Network,
            ErrorClass::Timeout,
        ] {
            assert!(class.retryable(), "{} should be retryable", class);
        }
        for class in [
            ErrorClass::Authentication,
            ErrorClass::Configuration,
            ErrorClass::Validation,
            ErrorClass::QueueFull,
            ErrorClass::Shutdown,
        ] {
            assert!(!class.retryable(), "{} should not be retryable", class);
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(ErrorClass::Authentication.category(), "client");
        assert_eq!(ErrorClass::Timeout.category(), "server");
        assert_eq!(ErrorClass::QueueFull.category(), "operational");
        assert_eq!(ErrorClass::Unknown.category(), "unknown");
    }

    #[test]
    fn test_auth_remedy_points_to_settings() {
        assert!(ErrorClass::Authentication.remedy().contains("settings"));
    }
}
