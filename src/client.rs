//! Caller-facing optimization client.
//!
//! Keep the public surface small: submit, metrics, cache stats, cache clearing.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod types;

pub use builder::{OptimizerClientBuilder, DEFAULT_SCENE};
pub use self::core::OptimizerClient;
pub use types::{CacheStatsSnapshot, Submission};
