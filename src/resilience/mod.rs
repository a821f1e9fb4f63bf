//! 弹性模式模块：提供令牌桶准入控制，保护上游服务调用。
//!
//! # Resilience Primitives Module
//!
//! Admission control for outbound provider calls.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`rate_limiter`] | Token bucket admission controller for throughput control |
//!
//! ## Admission Controller
//!
//! The controller never blocks. Callers poll [`AdmissionController::try_consume`] and retry
//! on the next scheduler tick when it returns `false`:
//!
//! ```rust
//! use ai_polish::resilience::rate_limiter::{AdmissionController, AdmissionConfig};
//!
//! let config = AdmissionConfig::new()
//!     .with_max_tokens(10)
//!     .with_refill_rate(5.0); // 5 tokens per second
//! let mut gate = AdmissionController::new(config);
//!
//! if gate.try_consume() {
//!     // Proceed with the provider call...
//! }
//! ```

pub mod rate_limiter;

pub use rate_limiter::{AdmissionConfig, AdmissionController, AdmissionSnapshot};
