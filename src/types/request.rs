//! Optimization request and mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio::time::Instant;
use uuid::Uuid;

/// Rewrite mode requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizeMode {
    #[default]
    Basic,
    Strict,
}

impl OptimizeMode {
    /// Tag used as the fingerprint prefix and in provider payloads.
    pub fn tag(&self) -> &'static str {
        match self {
            OptimizeMode::Basic => "basic",
            OptimizeMode::Strict => "strict",
        }
    }
}

impl fmt::Display for OptimizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for OptimizeMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(OptimizeMode::Basic),
            "strict" => Ok(OptimizeMode::Strict),
            other => Err(crate::Error::validation_with_context(
                format!("unknown optimize mode '{}'", other),
                crate::ErrorContext::new()
                    .with_field_path("mode")
                    .with_details("expected 'basic' or 'strict'"),
            )),
        }
    }
}

/// A request owned by the scheduler from enqueue until it is resolved or abandoned.
#[derive(Debug, Clone)]
pub struct OptimizeRequest {
    pub id: String,
    pub text: String,
    pub mode: OptimizeMode,
    /// Higher dispatches sooner.
    pub priority: i32,
    pub submitted_at: Instant,
    pub retry_count: u32,
}

impl OptimizeRequest {
    pub fn new(text: impl Into<String>, mode: OptimizeMode, priority: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            mode,
            priority,
            submitted_at: Instant::now(),
            retry_count: 0,
        }
    }

    /// Prepare the request for re-enqueue after a retryable failure.
    pub fn escalate(&mut self) {
        self.retry_count += 1;
        self.priority = i32::MAX;
    }
}
