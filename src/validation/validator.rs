//! Candidate validation.

use super::sanitize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this diff ratio a candidate is rejected as too similar.
pub const TOO_SIMILAR_RATIO: f64 = 0.05;
/// Below this diff ratio a candidate is accepted with a warning.
pub const MINOR_CHANGE_RATIO: f64 = 0.10;

/// Which call site is validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationProfile {
    /// Provider candidates: length ratio outside `[0.7, 1.3]` only warns.
    #[default]
    Strict,
    /// Local output: length ratio outside `[0.5, 2.0]` rejects.
    Loose,
}

impl ValidationProfile {
    fn length_bounds(&self) -> (f64, f64) {
        match self {
            ValidationProfile::Strict => (0.7, 1.3),
            ValidationProfile::Loose => (0.5, 2.0),
        }
    }

    fn length_is_hard_bound(&self) -> bool {
        matches!(self, ValidationProfile::Loose)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Empty,
    Identical,
    TooSimilar,
    Meaningless,
    LengthOutOfBounds,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Empty => "empty result",
            RejectReason::Identical => "identical to source",
            RejectReason::TooSimilar => "too similar",
            RejectReason::Meaningless => "meaningless content",
            RejectReason::LengthOutOfBounds => "length out of bounds",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub valid: bool,
    pub reason: Option<RejectReason>,
    pub warnings: Vec<String>,
    pub length_ratio: f64,
    pub diff_ratio: f64,
}

impl Verdict {
    fn reject(reason: RejectReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
            warnings: Vec::new(),
            length_ratio: 0.0,
            diff_ratio: 0.0,
        }
    }
}

/// Positional char mismatches plus the length difference.
pub fn diff_count(original: &str, candidate: &str) -> usize {
    let positional = original
        .chars()
        .zip(candidate.chars())
        .filter(|(a, b)| a != b)
        .count();
    let len_a = original.chars().count();
    let len_b = candidate.chars().count();
    positional + len_a.abs_diff(len_b)
}

/// `diff_count / len(original)`; `1.0` when the original is empty.
pub fn diff_ratio(original: &str, candidate: &str) -> f64 {
    let len = original.chars().count();
    if len == 0 {
        return 1.0;
    }
    diff_count(original, candidate) as f64 / len as f64
}

/// Accepts or rejects a candidate rewrite.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator {
    profile: ValidationProfile,
}

impl ResponseValidator {
    pub fn new(profile: ValidationProfile) -> Self {
        Self { profile }
    }

    pub fn strict() -> Self {
        Self::new(ValidationProfile::Strict)
    }

    pub fn loose() -> Self {
        Self::new(ValidationProfile::Loose)
    }

    pub fn validate(&self, original: &str, candidate: &str) -> Verdict {
        if candidate.trim().is_empty() {
            return Verdict::reject(RejectReason::Empty);
        }
        if candidate.trim() == original.trim() {
            return Verdict::reject(RejectReason::Identical);
        }

        let original_len = original.chars().count();
        let candidate_len = candidate.chars().count();
        let length_ratio = if original_len == 0 {
            f64::INFINITY
        } else {
            candidate_len as f64 / original_len as f64
        };
        let diff_ratio = diff_ratio(original, candidate);

        let mut verdict = Verdict {
            valid: true,
            reason: None,
            warnings: Vec::new(),
            length_ratio,
            diff_ratio,
        };

        if sanitize::assess(candidate).meaningless {
            verdict.valid = false;
            verdict.reason = Some(RejectReason::Meaningless);
            return verdict;
        }

        if diff_ratio < TOO_SIMILAR_RATIO {
            verdict.valid = false;
            verdict.reason = Some(RejectReason::TooSimilar);
            return verdict;
        }
        if diff_ratio < MINOR_CHANGE_RATIO {
            verdict
                .warnings
                .push(format!("minor changes only (diff ratio {:.3})", diff_ratio));
        }

        let (low, high) = self.profile.length_bounds();
        if length_ratio < low || length_ratio > high {
            if self.profile.length_is_hard_bound() {
                verdict.valid = false;
                verdict.reason = Some(RejectReason::LengthOutOfBounds);
                return verdict;
            }
            verdict.warnings.push(format!(
                "length ratio {:.2} outside [{}, {}]",
                length_ratio, low, high
            ));
        }

        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text() {
        let v = ResponseValidator::strict().validate("同样的文本", "同样的文本");
        assert!(!v.valid);
        assert_eq!(v.reason, Some(RejectReason::Identical));
        assert_eq!(v.reason.unwrap().as_str(), "identical to source");
    }

    #[test]
    fn test_identical_after_trim() {
        let v = ResponseValidator::strict().validate("  text here  ", "text here\n");
        assert_eq!(v.reason, Some(RejectReason::Identical));
    }

    #[test]
    fn test_empty_result() {
        let v = ResponseValidator::strict().validate("abc", "");
        assert!(!v.valid);
        assert_eq!(v.reason.unwrap().as_str(), "empty result");

        let v = ResponseValidator::strict().validate("abc", "   \n");
        assert_eq!(v.reason, Some(RejectReason::Empty));
    }

    #[test]
    fn test_too_similar() {
        let original = "a".repeat(100);
        let mut candidate = "a".repeat(99);
        candidate.push('b');

        let v = ResponseValidator::strict().validate(&original, &candidate);
        assert!(!v.valid);
        assert_eq!(v.reason, Some(RejectReason::TooSimilar));
        assert!(v.diff_ratio < TOO_SIMILAR_RATIO);
        assert!((v.diff_ratio - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_minor_change_warns() {
        let original = "a".repeat(100);
        let candidate = format!("{}{}", "b".repeat(7), "a".repeat(93));
        let v = ResponseValidator::strict().validate(&original, &candidate);
        assert!(v.valid);
        assert_eq!(v.warnings.len(), 1);
        assert!(v.warnings[0].contains("minor changes"));
    }

    #[test]
    fn test_diff_counts_length_difference() {
        assert_eq!(diff_count("abc", "abcde"), 2);
        assert_eq!(diff_count("abc", "xbc"), 1);
        assert_eq!(diff_count("投资有风险", "投资存在风险"), 4);
    }

    #[test]
    fn test_strict_length_ratio_only_warns() {
        let original = "The results were good overall.";
        let candidate = "Overall, the quarterly results were consistently good across every region and team.";
        let v = ResponseValidator::strict().validate(original, candidate);
        assert!(v.valid);
        assert!(v.warnings.iter().any(|w| w.contains("length ratio")));
    }

    #[test]
    fn test_loose_length_ratio_rejects() {
        let original = "The results were good.";
        let candidate = "Overall, the quarterly results were consistently good across every region, team and product line.";
        let v = ResponseValidator::loose().validate(original, candidate);
        assert!(!v.valid);
        assert_eq!(v.reason, Some(RejectReason::LengthOutOfBounds));
    }

    #[test]
    fn test_meaningless_overrides_other_checks() {
        let v = ResponseValidator::strict().validate("投资有风险，入市需谨慎。", "404 Not Found");
        assert!(!v.valid);
        assert_eq!(v.reason, Some(RejectReason::Meaningless));
    }

    #[test]
    fn test_valid_rewrite() {
        let v = ResponseValidator::strict().validate(
            "我们觉得这个方案非常好，但是成本很高。",
            "我们认为该方案十分出色，然而成本较高。",
        );
        assert!(v.valid, "{:?}", v);
        assert!(v.reason.is_none());
    }
}
