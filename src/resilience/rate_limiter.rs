use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct AdmissionSnapshot {
    pub refill_rate: f64,
    pub max_tokens: f64,
    pub tokens: f64,
    /// Estimated wait time until a token is available (ms), if currently empty.
    pub estimated_wait_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Maximum burst size (tokens).
    pub max_tokens: f64,
    /// Tokens per second.
    pub refill_rate: f64,
}

impl AdmissionConfig {
    /// Create a new config with default values (10 tokens, 5 per second).
    pub fn new() -> Self {
        Self {
            max_tokens: 10.0,
            refill_rate: 5.0,
        }
    }

    /// Set the maximum tokens (burst size)
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens as f64;
        self
    }

    /// Set the refill rate (tokens per second)
    pub fn with_refill_rate(mut self, rate: f64) -> Self {
        self.refill_rate = rate;
        self
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Token-bucket admission controller.
///
/// - Starts full
/// - Non-blocking: [`try_consume`](Self::try_consume) returns `false` when empty
/// - Owned by the dispatcher; mutated only from the dispatch path
#[derive(Debug)]
pub struct AdmissionController {
    cfg: AdmissionConfig,
    tokens: f64,
    last_refill: Instant,
}

impl AdmissionController {
    pub fn new(cfg: AdmissionConfig) -> Self {
        Self {
            tokens: cfg.max_tokens,
            last_refill: Instant::now(),
            cfg,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.cfg.refill_rate).min(self.cfg.max_tokens);
        self.last_refill = now;
    }

    /// Refill, then take one token if at least one is available.
    pub fn try_consume(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    pub fn snapshot(&mut self) -> AdmissionSnapshot {
        self.refill();
        let estimated_wait_ms = if self.tokens < 1.0 && self.cfg.refill_rate > 0.0 {
            let missing = 1.0 - self.tokens;
            Some((missing / self.cfg.refill_rate * 1000.0) as u64)
        } else {
            None
        };
        AdmissionSnapshot {
            refill_rate: self.cfg.refill_rate,
            max_tokens: self.cfg.max_tokens,
            tokens: self.tokens,
            estimated_wait_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_admission_config_builder() {
        let config = AdmissionConfig::new()
            .with_max_tokens(100)
            .with_refill_rate(50.0);
        assert_eq!(config.max_tokens, 100.0);
        assert_eq!(config.refill_rate, 50.0);
    }

    #[test]
    fn test_admission_config_defaults() {
        let config = AdmissionConfig::default();
        assert_eq!(config.max_tokens, 10.0);
        assert_eq!(config.refill_rate, 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_burst_then_empty() {
        let mut gate = AdmissionController::new(
            AdmissionConfig::new().with_max_tokens(3).with_refill_rate(1.0),
        );

        assert!(gate.try_consume());
        assert!(gate.try_consume());
        assert!(gate.try_consume());
        assert!(!gate.try_consume());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_token_refills_after_one_second() {
        let mut gate = AdmissionController::new(
            AdmissionConfig::new().with_max_tokens(1).with_refill_rate(1.0),
        );

        assert!(gate.try_consume());
        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(!gate.try_consume());

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(gate.try_consume());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_is_capped() {
        let mut gate = AdmissionController::new(
            AdmissionConfig::new().with_max_tokens(2).with_refill_rate(10.0),
        );
        tokio::time::advance(Duration::from_secs(60)).await;
        let snapshot = gate.snapshot();
        assert_eq!(snapshot.tokens, 2.0);
        assert!(snapshot.estimated_wait_ms.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_estimates_wait() {
        let mut gate = AdmissionController::new(
            AdmissionConfig::new().with_max_tokens(1).with_refill_rate(5.0),
        );
        assert!(gate.try_consume());
        let snapshot = gate.snapshot();
        assert_eq!(snapshot.estimated_wait_ms, Some(200));
    }
}
