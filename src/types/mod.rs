//! 类型系统模块：定义文本优化请求、响应与统计的核心数据类型。
//!
//! # Types Module
//!
//! Core data types shared by the scheduler, the provider prober and the caller-facing
//! client.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`OptimizeRequest`] | A queued request owned by the scheduler until resolved |
//! | [`OptimizeMode`] | Rewrite mode (`basic` or `strict`) |
//! | [`OptimizeResponse`] | Result handed back to the caller |
//! | [`TextStats`] | Length / script statistics for an original + optimized pair |
//! | [`Message`] | Chat message used by the chat-completion payload shape |
//!
//! ## Example
//!
//! ```rust
//! use ai_polish::types::{OptimizeMode, TextStats};
//!
//! let mode: OptimizeMode = "strict".parse().unwrap();
//! assert_eq!(mode.tag(), "strict");
//!
//! let stats = TextStats::compute("投资有风险", "投资存在风险");
//! assert_eq!(stats.length_difference, 1);
//! ```

pub mod message;
pub mod request;
pub mod response;
pub mod stats;

pub use message::{Message, MessageRole};
pub use request::{OptimizeMode, OptimizeRequest};
pub use response::{ErrorInfo, OptimizeResponse, ResponseSource};
pub use stats::{PairCount, TextStats};
