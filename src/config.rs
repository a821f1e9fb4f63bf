//! Client tunables.
//!
//! Every field has a default, so an empty YAML document is a valid configuration.
//! Environment overrides (applied by [`ClientConfig::with_env_overrides`]):
//! - `POLISH_CACHE_CAPACITY`
//! - `POLISH_MAX_TOKENS` / `POLISH_REFILL_RATE` (token bucket)
//! - `POLISH_TICK_MS` (dispatch tick)
//! - `POLISH_MAX_QUEUE`
//! - `POLISH_HTTP_TIMEOUT_SECS` (per provider call)

use crate::cache::DEFAULT_SIMILARITY_THRESHOLD;
use crate::provider::PayloadSettings;
use crate::resilience::AdmissionConfig;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODELS: &[&str] = &[
    "gpt-4o-mini",
    "gpt-4o",
    "gpt-5-chat",
    "DeepSeek-R1",
    "o3-mini",
    "o3",
];

pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "v1/chat/completions",
    "v1/completions",
    "api/v1/chat/completions",
    "api/chat/completions",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub capacity: usize,
    pub similarity_threshold: f64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: 100,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionSettings {
    pub max_tokens: u32,
    /// Tokens per second.
    pub refill_rate: f64,
}

impl Default for AdmissionSettings {
    fn default() -> Self {
        Self {
            max_tokens: 10,
            refill_rate: 5.0,
        }
    }
}

impl AdmissionSettings {
    pub fn to_admission_config(&self) -> AdmissionConfig {
        AdmissionConfig::default()
            .with_max_tokens(self.max_tokens)
            .with_refill_rate(self.refill_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub tick_interval_ms: u64,
    pub max_retries: u32,
    pub max_queue_len: usize,
    /// Upper bound on one whole probe (all endpoints and models).
    pub dispatch_timeout_ms: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            max_retries: 3,
            max_queue_len: 256,
            dispatch_timeout_ms: 90_000,
        }
    }
}

impl SchedulerSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Tried in order; a 429 advances to the next one.
    pub models: Vec<String>,
    /// Paths relative to the base URL, tried in order.
    pub endpoints: Vec<String>,
    pub request_timeout_ms: u64,
    pub user_agent: String,
    #[serde(flatten)]
    pub payload: PayloadSettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|s| s.to_string()).collect(),
            endpoints: DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            request_timeout_ms: 30_000,
            user_agent: format!("ai-polish/{}", env!("CARGO_PKG_VERSION")),
            payload: PayloadSettings::default(),
        }
    }
}

/// All tunables for one [`crate::OptimizerClient`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub cache: CacheSettings,
    pub admission: AdmissionSettings,
    pub scheduler: SchedulerSettings,
    pub provider: ProviderSettings,
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn invalid(field: &str, message: impl Into<String>) -> Error {
    Error::configuration_with_context(
        message,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("client_config"),
    )
}

impl ClientConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read config file: {}", e),
                ErrorContext::new()
                    .with_details(path.as_ref().display().to_string())
                    .with_source("client_config"),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Apply `POLISH_*` environment overrides; unparsable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_parse::<usize>("POLISH_CACHE_CAPACITY") {
            self.cache.capacity = v;
        }
        if let Some(v) = env_parse::<u32>("POLISH_MAX_TOKENS") {
            self.admission.max_tokens = v;
        }
        if let Some(v) = env_parse::<f64>("POLISH_REFILL_RATE") {
            self.admission.refill_rate = v;
        }
        if let Some(v) = env_parse::<u64>("POLISH_TICK_MS") {
            self.scheduler.tick_interval_ms = v;
        }
        if let Some(v) = env_parse::<usize>("POLISH_MAX_QUEUE") {
            self.scheduler.max_queue_len = v;
        }
        if let Some(v) = env_parse::<u64>("POLISH_HTTP_TIMEOUT_SECS") {
            self.provider.request_timeout_ms = v.saturating_mul(1000);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.capacity == 0 {
            return Err(invalid("cache.capacity", "cache capacity must be at least 1"));
        }
        let t = self.cache.similarity_threshold;
        if !t.is_finite() || t < 0.0 {
            return Err(invalid(
                "cache.similarity_threshold",
                "similarity threshold must be a non-negative number",
            ));
        }
        if self.admission.max_tokens == 0 {
            return Err(invalid("admission.max_tokens", "token bucket needs at least one token"));
        }
        let r = self.admission.refill_rate;
        if !r.is_finite() || r <= 0.0 {
            return Err(invalid(
                "admission.refill_rate",
                "refill rate must be a positive number",
            ));
        }
        if self.scheduler.tick_interval_ms == 0 {
            return Err(invalid("scheduler.tick_interval_ms", "tick interval must be non-zero"));
        }
        if self.scheduler.max_queue_len == 0 {
            return Err(invalid("scheduler.max_queue_len", "queue must hold at least one request"));
        }
        if self.scheduler.dispatch_timeout_ms == 0 {
            return Err(invalid(
                "scheduler.dispatch_timeout_ms",
                "dispatch timeout must be non-zero",
            ));
        }
        if self.provider.models.is_empty() {
            return Err(invalid("provider.models", "at least one model is required"));
        }
        if self.provider.endpoints.is_empty() {
            return Err(invalid("provider.endpoints", "at least one endpoint is required"));
        }
        if self.provider.request_timeout_ms == 0 {
            return Err(invalid(
                "provider.request_timeout_ms",
                "request timeout must be non-zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = ClientConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.cache.capacity, 100);
        assert_eq!(cfg.admission.max_tokens, 10);
        assert_eq!(cfg.admission.refill_rate, 5.0);
        assert_eq!(cfg.scheduler.tick_interval_ms, 200);
        assert_eq!(cfg.scheduler.max_retries, 3);
        assert_eq!(cfg.provider.request_timeout_ms, 30_000);
        assert_eq!(cfg.provider.payload.max_tokens, 2000);
    }

    #[test]
    fn test_partial_yaml() {
        let cfg = ClientConfig::from_yaml_str(
            r#"
cache:
  capacity: 5
admission:
  refill_rate: 1.5
provider:
  models: [m1, m2]
  max_tokens: 512
"#,
        )
        .unwrap();
        assert_eq!(cfg.cache.capacity, 5);
        assert_eq!(cfg.cache.similarity_threshold, 0.85);
        assert_eq!(cfg.admission.max_tokens, 10);
        assert_eq!(cfg.admission.refill_rate, 1.5);
        assert_eq!(cfg.provider.models, vec!["m1", "m2"]);
        assert_eq!(cfg.provider.endpoints.len(), 4);
        assert_eq!(cfg.provider.payload.max_tokens, 512);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ClientConfig::from_yaml_str("  \n").unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_invalid_values_carry_field_path() {
        let err = ClientConfig::from_yaml_str("cache:\n  capacity: 0\n").unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("cache.capacity")
        );

        let err = ClientConfig::from_yaml_str("admission:\n  refill_rate: -1\n").unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("admission.refill_rate")
        );

        let err = ClientConfig::from_yaml_str("provider:\n  models: []\n").unwrap_err();
        assert!(err.to_string().contains("provider.models"));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            ClientConfig::from_yaml_str("cache: [not, a, map]"),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_path("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("POLISH_MAX_QUEUE", "12");
        env::set_var("POLISH_HTTP_TIMEOUT_SECS", "7");
        env::set_var("POLISH_TICK_MS", "not-a-number");
        let cfg = ClientConfig::default().with_env_overrides();
        env::remove_var("POLISH_MAX_QUEUE");
        env::remove_var("POLISH_HTTP_TIMEOUT_SECS");
        env::remove_var("POLISH_TICK_MS");

        assert_eq!(cfg.scheduler.max_queue_len, 12);
        assert_eq!(cfg.provider.request_timeout_ms, 7_000);
        assert_eq!(cfg.scheduler.tick_interval_ms, 200);
    }
}
