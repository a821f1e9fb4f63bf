//! # ai-polish
//!
//! 可靠的文本优化客户端：缓存、令牌桶准入、优先级调度、多端点故障转移与本地兜底改写。
//!
//! Resilient text-optimization client that turns "optimize this text" into a validated
//! result despite an unreliable, multi-shaped, rate-limited upstream API.
//!
//! ## Overview
//!
//! A request flows through one [`OptimizerClient`]:
//!
//! - **Cache**: exact fingerprint hits resolve on submission; similar texts can be served at
//!   dispatch time
//! - **Admission**: a token bucket gates outbound provider calls
//! - **Scheduling**: a bounded priority queue drained by a single dispatcher task, so at most
//!   one provider call is in flight
//! - **Failover**: endpoints, models and payload shapes are probed in order
//! - **Validation**: candidates that are empty, identical, too similar or meaningless are
//!   replaced by a deterministic local rewrite
//!
//! Without credentials the client never touches the network and serves the local rewrite.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_polish::{OptimizeMode, OptimizerClient, StaticConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> ai_polish::Result<()> {
//!     let client = OptimizerClient::builder()
//!         .config_provider(Arc::new(StaticConfig::new("sk-...", "https://api.example.com")))
//!         .build()?;
//!
//!     let response = client.submit("投资有风险。", OptimizeMode::Basic, 1).await;
//!     println!("{:?}", response.optimized_text);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Composition root, builder and submission future |
//! | [`scheduler`] | Priority queue and the dispatcher task |
//! | [`provider`] | Credentials, payload shapes, text extraction and failover probing |
//! | [`cache`] | Fingerprint LRU cache with similarity lookup |
//! | [`resilience`] | Token-bucket admission control |
//! | [`validation`] | Candidate validation profiles and the local rewrite |
//! | [`metrics`] | Request counters, latency and request rate |
//! | [`config`] | Tunables, YAML loading and environment overrides |
//! | [`style_guide`] | Per-scene glossary and banned-term annotations |
//! | [`types`] | Requests, responses and text statistics |

pub mod cache;
pub mod client;
pub mod config;
pub mod error_code;
pub mod metrics;
pub mod provider;
pub mod resilience;
pub mod scheduler;
pub mod style_guide;
pub mod transport;
pub mod types;
pub mod validation;

// Re-export main types for convenience
pub use client::{CacheStatsSnapshot, OptimizerClient, OptimizerClientBuilder, Submission};
pub use config::ClientConfig;
pub use error_code::ErrorClass;
pub use metrics::MetricsSnapshot;
pub use provider::{CompletionSource, ConfigProvider, Credentials, EnvConfig, StaticConfig};
pub use style_guide::{PolicyHit, StyleGuide};
pub use types::{OptimizeMode, OptimizeRequest, OptimizeResponse, ResponseSource, TextStats};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
