//! Cache key generation.

use crate::types::OptimizeMode;
use serde::{Deserialize, Serialize};

/// Cache key: mode tag followed by the raw, unnormalized input text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub mode: OptimizeMode,
    pub text: String,
}

impl Fingerprint {
    pub fn new(mode: OptimizeMode, text: impl Into<String>) -> Self {
        Self {
            mode,
            text: text.into(),
        }
    }

    /// The concatenated key string.
    pub fn key(&self) -> String {
        format!("{}{}", self.mode.tag(), self.text)
    }

    pub fn has_mode(&self, mode: OptimizeMode) -> bool {
        self.mode == mode
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.mode.tag(), self.text)
    }
}

/// Length-ratio similarity with a shared-prefix bonus.
///
/// `min(len) / max(len)`, plus `0.1` when the first `min(50, minLen / 2)` chars match.
/// Both-empty inputs score `0.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return 0.0;
    }
    let min_len = len_a.min(len_b);
    let mut score = min_len as f64 / max_len as f64;

    let prefix = 50.min(min_len / 2);
    if a.chars().take(prefix).eq(b.chars().take(prefix)) {
        score += 0.1;
    }
    score
}
