//! 上游服务探测：凭据、请求体形态、文本提取与多端点/多模型故障转移。
//!
//! Provider access.
//!
//! The scheduler only sees [`CompletionSource`]; [`ProviderProber`] is the HTTP-backed
//! implementation and tests substitute their own.

mod config;
mod extract;
mod payload;
mod prober;

pub use config::{ConfigProvider, Credentials, EnvConfig, StaticConfig};
pub use extract::{extract_text, looks_like_html};
pub use payload::{build_payload, PayloadSettings, PayloadShape};
pub use prober::ProviderProber;

use crate::types::OptimizeMode;
use crate::Result;
use async_trait::async_trait;

/// Text produced for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Candidate from an upstream model; still subject to validation.
    Provider {
        text: String,
        model: String,
        endpoint: String,
    },
    /// Deterministic local rewrite, produced without any network call.
    Local { text: String, reason: String },
}

impl Completion {
    pub fn text(&self) -> &str {
        match self {
            Completion::Provider { text, .. } | Completion::Local { text, .. } => text,
        }
    }
}

/// Produces a rewrite candidate for `(text, mode)`.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    async fn complete(&self, text: &str, mode: OptimizeMode) -> Result<Completion>;
}
