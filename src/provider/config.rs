//! Credential sources.

use async_trait::async_trait;
use keyring::Entry;
use std::env;
use std::fmt;
use url::Url;

/// API key and base URL for the upstream provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub base_url: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Non-blank key and an absolute http(s) base URL.
    pub fn is_well_formed(&self) -> bool {
        if self.api_key.trim().is_empty() {
            return false;
        }
        match Url::parse(self.base_url.trim()) {
            Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
            Err(_) => false,
        }
    }

    /// `base_url` and `path` joined with exactly one slash.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Supplies provider credentials. `None` routes requests to the local fallback.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    async fn credentials(&self) -> Option<Credentials>;
}

/// Fixed credentials, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    credentials: Option<Credentials>,
}

impl StaticConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            credentials: Some(Credentials::new(api_key, base_url)),
        }
    }

    pub fn empty() -> Self {
        Self { credentials: None }
    }
}

#[async_trait]
impl ConfigProvider for StaticConfig {
    async fn credentials(&self) -> Option<Credentials> {
        self.credentials.clone()
    }
}

/// Keyring first, then `POLISH_API_KEY`; base URL from `POLISH_BASE_URL`.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    service: String,
}

impl EnvConfig {
    pub const KEYRING_SERVICE: &'static str = "ai-polish";

    pub fn new() -> Self {
        Self {
            service: Self::KEYRING_SERVICE.to_string(),
        }
    }

    fn api_key(&self) -> Option<String> {
        // 1. Try Keyring
        if let Ok(entry) = Entry::new(&self.service, "api_key") {
            if let Ok(key) = entry.get_password() {
                return Some(key);
            }
        }

        // 2. Try Environment Variable
        env::var("POLISH_API_KEY").ok()
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigProvider for EnvConfig {
    async fn credentials(&self) -> Option<Credentials> {
        let api_key = self.api_key()?;
        let base_url = env::var("POLISH_BASE_URL").ok()?;
        Some(Credentials::new(api_key, base_url))
    }
}
