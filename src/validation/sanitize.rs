//! Candidate sanitization: HTML stripping and meaningless-content detection.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static HTML_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(?:[a-zA-Z]+|#\d+|#x[0-9a-fA-F]+);").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Error-page and placeholder markers, matched case-insensitively.
static MEANINGLESS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)<!doctype",
        r"(?i)<html",
        r"(?i)not found",
        r"(?i)unauthorized",
        r"(?i)forbidden",
        r"(?i)access denied",
        r"(?i)internal server error",
        r"(?i)bad gateway",
        r"(?i)service unavailable",
        r"(?i)^\s*error\b",
        r"(?i)\berror\s*[45]\d\d\b",
        r"(?i)^\s*(null|undefined|none)\s*$",
        r"(?i)\[object object\]",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Optimization-related terms that mark a short candidate as useful.
const USEFUL_KEYWORDS: &[&str] = &[
    "优化", "改进", "润色", "改写", "建议", "修改", "optimi", "improv", "rewrit", "revis", "polish",
    "suggest",
];

/// Below this many chars a stripped candidate is suspect.
pub const MIN_MEANINGFUL_CHARS: usize = 10;
/// Above this many chars a suspect candidate is accepted anyway.
pub const RESCUE_CHARS: usize = 20;

/// Remove HTML tags and entities, collapse whitespace and trim.
pub fn strip_html(text: &str) -> String {
    let without_tags = HTML_TAG.replace_all(text, " ");
    let without_entities = HTML_ENTITY.replace_all(&without_tags, " ");
    WHITESPACE
        .replace_all(&without_entities, " ")
        .trim()
        .to_string()
}

/// Whether `text` carries HTML tags or entities that [`strip_html`] would remove.
pub fn has_markup(text: &str) -> bool {
    HTML_TAG.is_match(text) || HTML_ENTITY.is_match(text)
}

pub fn matches_meaningless_pattern(text: &str) -> bool {
    MEANINGLESS_PATTERNS.iter().any(|re| re.is_match(text))
}

pub fn contains_useful_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    USEFUL_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Outcome of sanitizing a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentAssessment {
    pub stripped: String,
    pub meaningless: bool,
}

/// A candidate is meaningless when its stripped form is empty, shorter than
/// [`MIN_MEANINGFUL_CHARS`] or matches an error marker, unless it contains a useful
/// keyword or is longer than [`RESCUE_CHARS`].
pub fn assess(candidate: &str) -> ContentAssessment {
    let stripped = strip_html(candidate);
    let len = stripped.chars().count();

    let suspect = stripped.is_empty()
        || len < MIN_MEANINGFUL_CHARS
        || matches_meaningless_pattern(candidate)
        || matches_meaningless_pattern(&stripped);
    let rescued = !stripped.is_empty() && (contains_useful_keyword(&stripped) || len > RESCUE_CHARS);

    ContentAssessment {
        meaningless: suspect && !rescued,
        stripped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello&nbsp;<b>world</b></p>\n"),
            "Hello world"
        );
        assert_eq!(strip_html("<div></div>"), "");
    }

    #[test]
    fn test_has_markup() {
        assert!(has_markup("<p>改写后的文本</p>"));
        assert!(has_markup("成本&amp;收益"));
        assert!(!has_markup("价格 < 成本"));
        assert!(!has_markup("plain text & more"));
    }

    #[test]
    fn test_error_page_is_meaningless() {
        assert!(assess("404 Not Found").meaningless);
        assert!(assess("<html><body>Unauthorized</body></html>").meaningless);
        assert!(assess("null").meaningless);
    }

    #[test]
    fn test_short_text_is_meaningless() {
        assert!(assess("好的。").meaningless);
    }

    #[test]
    fn test_useful_keyword_rescues_short_text() {
        assert!(!assess("建议：已优化").meaningless);
    }

    #[test]
    fn test_long_text_is_rescued_even_with_marker() {
        let text = "The page said not found but here is a long and perfectly fine rewritten sentence.";
        assert!(!assess(text).meaningless);
    }

    #[test]
    fn test_normal_text_passes() {
        assert!(!assess("投资存在风险，入市需谨慎。").meaningless);
    }
}
