//! Deterministic, network-free local rewrite.
//!
//! Applied when no provider is configured or when every provider candidate is rejected.
//! The rewrite is a pure function of `(text, mode, scene glossary)` and always returns
//! text that differs from its input.

use crate::types::OptimizeMode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

const CJK: &str = r"[一-龥]";

/// Substitutions applied in every mode.
const BASIC_VOCABULARY: &[(&str, &str)] = &[
    ("有风险", "存在风险"),
    ("但是", "然而"),
    ("所以", "因此"),
    ("觉得", "认为"),
    ("非常", "十分"),
    ("很多", "诸多"),
    ("马上", "立即"),
    ("好像", "似乎"),
    ("a lot of ", "many "),
    ("in order to ", "to "),
    ("can't", "cannot"),
    ("don't", "do not"),
    ("won't", "will not"),
    ("gonna", "going to"),
];

/// Additional substitutions for strict mode: absolute claims become hedged wording.
const STRICT_VOCABULARY: &[(&str, &str)] = &[
    ("保证收益", "预期收益"),
    ("稳赚不赔", "存在亏损可能"),
    ("稳赚", "可能获利"),
    ("肯定", "预计"),
    ("一定", "通常"),
    ("绝对", "相对"),
    ("最好", "较优"),
    ("guaranteed", "expected"),
    ("always", "typically"),
    ("never", "rarely"),
];

const CJK_DISCLAIMER: &str = "（以上内容仅供参考。）";
const LATIN_DISCLAIMER: &str = " (For reference only.)";
const CJK_SUMMARY: &str = "整体表述已优化。";
const LATIN_SUMMARY: &str = " Wording has been refined.";
const MARKER: &str = "【优化】";

static HAS_CJK: Lazy<Regex> = Lazy::new(|| Regex::new(CJK).expect("valid regex"));
static CJK_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"({CJK})[ \t]+({CJK})")).expect("valid regex"));
static CJK_TRAILING_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"({CJK})\.(\s|$)")).expect("valid regex"));
static LATIN_COMMA_NO_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",([A-Za-z])").expect("valid regex"));
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("valid regex"));
static CJK_PUNCTUATION: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [(",", "，"), (";", "；"), (":", "："), (r"\?", "？"), ("!", "！")]
        .iter()
        .map(|(ascii, full)| {
            let re = Regex::new(&format!(r"({CJK})\s*{ascii}\s*")).expect("valid regex");
            (re, *full)
        })
        .collect()
});

const CJK_TERMINALS: &[char] = &['。', '！', '？', '…', '」', '）', '”'];

/// Rule-based rewriter used as the last-resort fallback.
#[derive(Debug, Clone, Default)]
pub struct LocalRewriter {
    glossary: BTreeMap<String, String>,
}

impl LocalRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene glossary substitutions (`term -> canonical`) applied after the built-in vocabulary.
    pub fn with_glossary(mut self, glossary: BTreeMap<String, String>) -> Self {
        self.glossary = glossary;
        self
    }

    pub fn rewrite(&self, text: &str, mode: OptimizeMode) -> String {
        let original = text.trim();
        let cjk = HAS_CJK.is_match(original);

        let mut out = normalize_punctuation(original, cjk);
        out = apply_vocabulary(&out, BASIC_VOCABULARY);
        if mode == OptimizeMode::Strict {
            out = apply_vocabulary(&out, STRICT_VOCABULARY);
        }
        for (term, canonical) in &self.glossary {
            if !term.is_empty() {
                out = out.replace(term.as_str(), canonical);
            }
        }

        if mode == OptimizeMode::Strict {
            let disclaimer = if cjk { CJK_DISCLAIMER } else { LATIN_DISCLAIMER };
            if !out.ends_with(disclaimer.trim()) {
                out.push_str(disclaimer);
            }
        }

        if out.trim() == original {
            out.push_str(if cjk { CJK_SUMMARY } else { LATIN_SUMMARY });
        }
        if out.trim() == original {
            out = format!("{MARKER}{out}");
        }
        out
    }
}

fn apply_vocabulary(text: &str, vocabulary: &[(&str, &str)]) -> String {
    vocabulary
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

fn normalize_punctuation(text: &str, cjk: bool) -> String {
    let mut out = text.to_string();

    if cjk {
        // Overlapping gaps ("中 文 字") need repeated passes.
        loop {
            let next = CJK_GAP.replace_all(&out, "$1$2").into_owned();
            if next == out {
                break;
            }
            out = next;
        }
        for (re, full) in CJK_PUNCTUATION.iter() {
            out = re.replace_all(&out, format!("${{1}}{full}").as_str()).into_owned();
        }
        out = CJK_TRAILING_PERIOD.replace_all(&out, "${1}。${2}").into_owned();
        if let Some(last) = out.chars().last() {
            if HAS_CJK.is_match(&last.to_string()) {
                out.push('。');
            } else if !CJK_TERMINALS.contains(&last) && last.is_alphanumeric() {
                out.push('。');
            }
        }
    } else {
        out = LATIN_COMMA_NO_SPACE.replace_all(&out, ", $1").into_owned();
    }

    MULTI_SPACE.replace_all(&out, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_substitution() {
        let out = LocalRewriter::new().rewrite("投资有风险。", OptimizeMode::Basic);
        assert_eq!(out, "投资存在风险。");
    }

    #[test]
    fn test_identical_input_still_changes() {
        let input = "同样的文本";
        let out = LocalRewriter::new().rewrite(input, OptimizeMode::Basic);
        assert_ne!(out, input);
        assert_eq!(out, "同样的文本。");
    }

    #[test]
    fn test_summary_appended_when_rules_do_nothing() {
        let input = "同样的文本。";
        let out = LocalRewriter::new().rewrite(input, OptimizeMode::Basic);
        assert_eq!(out, "同样的文本。整体表述已优化。");
    }

    #[test]
    fn test_latin_summary() {
        let input = "Plain sentence.";
        let out = LocalRewriter::new().rewrite(input, OptimizeMode::Basic);
        assert_eq!(out, "Plain sentence. Wording has been refined.");
    }

    #[test]
    fn test_cjk_punctuation_normalization() {
        let out = LocalRewriter::new().rewrite("价格 上涨 , 需求下降!", OptimizeMode::Basic);
        assert_eq!(out, "价格上涨，需求下降！");
    }

    #[test]
    fn test_latin_comma_spacing() {
        let out = LocalRewriter::new().rewrite("We can't wait,really.", OptimizeMode::Basic);
        assert_eq!(out, "We cannot wait, really.");
    }

    #[test]
    fn test_strict_adds_disclaimer_and_hedges() {
        let out = LocalRewriter::new().rewrite("这个产品保证收益。", OptimizeMode::Strict);
        assert_eq!(out, "这个产品预期收益。（以上内容仅供参考。）");
    }

    #[test]
    fn test_strict_disclaimer_not_duplicated() {
        let rewriter = LocalRewriter::new();
        let once = rewriter.rewrite("稳赚的机会", OptimizeMode::Strict);
        let twice = rewriter.rewrite(&once, OptimizeMode::Strict);
        assert_eq!(twice.matches("仅供参考").count(), 1);
        assert_ne!(twice, once);
    }

    #[test]
    fn test_glossary_applied() {
        let mut glossary = BTreeMap::new();
        glossary.insert("APP".to_string(), "应用程序".to_string());
        let out = LocalRewriter::new()
            .with_glossary(glossary)
            .rewrite("下载APP即可体验。", OptimizeMode::Basic);
        assert_eq!(out, "下载应用程序即可体验。");
    }

    #[test]
    fn test_deterministic() {
        let r = LocalRewriter::new();
        let a = r.rewrite("但是很多人觉得不错", OptimizeMode::Strict);
        let b = r.rewrite("但是很多人觉得不错", OptimizeMode::Strict);
        assert_eq!(a, b);
    }
}
