//! Shared fixtures for integration tests.

#![allow(dead_code)]

use ai_polish::provider::Completion;
use ai_polish::types::OptimizeMode;
use ai_polish::{ClientConfig, CompletionSource, Error};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Responder = Box<dyn Fn(&str, usize) -> ai_polish::Result<Completion> + Send + Sync>;

/// A [`CompletionSource`] that records every call and answers from a closure.
///
/// The closure receives the request text and the 0-based call index.
pub struct ScriptedSource {
    calls: Mutex<Vec<String>>,
    respond: Responder,
    delay: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(
        respond: impl Fn(&str, usize) -> ai_polish::Result<Completion> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
            delay: None,
        })
    }

    /// Always answers with a provider rewrite that passes validation.
    pub fn polishing() -> Arc<Self> {
        Self::new(|text, _| Ok(provider(polished(text))))
    }

    /// Every call sleeps for `delay` before answering.
    pub fn slow(
        delay: Duration,
        respond: impl Fn(&str, usize) -> ai_polish::Result<Completion> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
            delay: Some(delay),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionSource for ScriptedSource {
    async fn complete(&self, text: &str, _mode: OptimizeMode) -> ai_polish::Result<Completion> {
        let idx = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(text.to_string());
            calls.len() - 1
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.respond)(text, idx)
    }
}

pub fn polished(text: &str) -> String {
    format!("{}，这是经过润色后的版本", text.trim_end_matches('。'))
}

pub fn provider(text: impl Into<String>) -> Completion {
    Completion::Provider {
        text: text.into(),
        model: "fake-model".to_string(),
        endpoint: "v1/chat/completions".to_string(),
    }
}

pub fn network_error() -> Error {
    Error::Transport(ai_polish::transport::TransportError::Other(
        "connection reset by peer".to_string(),
    ))
}

/// Default config with similarity lookup disabled.
///
/// Scores top out at 1.1, and any two equal-length texts score at least 1.0, so tests that
/// submit distinct texts of the same length would otherwise be served from the cache.
pub fn config() -> ClientConfig {
    let mut cfg = ClientConfig::default();
    cfg.cache.similarity_threshold = 2.0;
    cfg
}

/// [`config`] with a token bucket of `max_tokens` refilling at `refill_rate` per second.
pub fn config_with_bucket(max_tokens: u32, refill_rate: f64) -> ClientConfig {
    let mut cfg = config();
    cfg.admission.max_tokens = max_tokens;
    cfg.admission.refill_rate = refill_rate;
    cfg
}
