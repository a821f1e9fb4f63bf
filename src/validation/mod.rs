//! 结果校验模块：判断候选改写是否可用，并提供确定性的本地兜底改写。
//!
//! # Response Validation Module
//!
//! Decides whether a candidate rewrite is usable and synthesizes a deterministic local
//! fallback when it is not.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResponseValidator`] | Empty / identical / meaningless / too-similar / length checks |
//! | [`ValidationProfile`] | `Strict` (length warns) and `Loose` (length rejects) policies |
//! | [`LocalRewriter`] | Pure rule-based rewrite that always differs from its input |
//! | [`sanitize`] | HTML stripping and meaningless-content detection |
//!
//! ## Heuristics
//!
//! - `diffCount` = positional char mismatches + length difference; `diffRatio = diffCount / len(original)`
//! - `diffRatio < 0.05` rejects as too similar, `< 0.10` accepts with a warning
//! - Strict profile warns when `len(candidate) / len(original)` leaves `[0.7, 1.3]`;
//!   the loose profile rejects outside `[0.5, 2.0]`
//!
//! ## Example
//!
//! ```rust
//! use ai_polish::validation::{LocalRewriter, RejectReason, ResponseValidator};
//! use ai_polish::types::OptimizeMode;
//!
//! let verdict = ResponseValidator::strict().validate("同样的文本", "同样的文本");
//! assert_eq!(verdict.reason, Some(RejectReason::Identical));
//!
//! let fallback = LocalRewriter::new().rewrite("同样的文本", OptimizeMode::Basic);
//! assert_ne!(fallback, "同样的文本");
//! ```

mod fallback;
pub mod sanitize;
mod validator;

pub use fallback::LocalRewriter;
pub use validator::{
    diff_count, diff_ratio, RejectReason, ResponseValidator, ValidationProfile, Verdict,
    MINOR_CHANGE_RATIO, TOO_SIMILAR_RATIO,
};
