//! 响应缓存模块：按指纹缓存优化结果，减少重复的上游调用。
//!
//! # Fingerprint Cache Module
//!
//! Bounded least-recently-used cache mapping a request [`Fingerprint`] (mode tag + raw
//! text) to a prior [`OptimizeResponse`](crate::types::OptimizeResponse).
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`FingerprintCache`] | LRU cache with hit/miss statistics and similarity lookup |
//! | [`Fingerprint`] | Cache key derived from mode and raw input text |
//! | [`CacheStats`] | Counters for hits, misses, sets and evictions |
//!
//! ## Similarity lookup
//!
//! [`FingerprintCache::find_similar`] scores same-mode entries with a length ratio plus a
//! `0.1` bonus for an identical prefix of `min(50, minLen / 2)` chars. The score is a
//! coarse approximation and its arithmetic is part of the observable contract.
//!
//! ## Example
//!
//! ```rust
//! use ai_polish::cache::{Fingerprint, FingerprintCache};
//! use ai_polish::types::{OptimizeMode, OptimizeResponse, ResponseSource};
//!
//! let cache = FingerprintCache::new(2);
//! let fp = Fingerprint::new(OptimizeMode::Basic, "hello world");
//! cache.set(fp.clone(), OptimizeResponse::success("hello world", "Hello, world.", ResponseSource::Cache));
//! assert!(cache.get(&fp).is_some());
//! ```

mod fingerprint;
mod key;

pub use fingerprint::{CacheStats, FingerprintCache, DEFAULT_SIMILARITY_THRESHOLD};
pub use key::{similarity, Fingerprint};
