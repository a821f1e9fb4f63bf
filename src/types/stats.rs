//! Text statistics attached to successful responses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CHINESE_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[一-龥]").expect("valid regex"));
/// ASCII word-character runs. CJK text must not glue onto adjacent Latin words.
static ASCII_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("valid regex"));

/// Words made of ASCII letters only, delimited by non-ASCII-word characters.
fn english_words(text: &str) -> usize {
    ASCII_WORD
        .find_iter(text)
        .filter(|m| m.as_str().bytes().all(|b| b.is_ascii_alphabetic()))
        .count()
}

/// A before/after count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PairCount {
    pub original: usize,
    pub optimized: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    pub original_length: usize,
    pub optimized_length: usize,
    pub length_difference: i64,
    /// Percent change of the length, rounded to two decimals.
    pub percentage_change: f64,
    pub chinese_char_counts: PairCount,
    pub english_word_counts: PairCount,
}

impl TextStats {
    /// Lengths are counted in chars.
    pub fn compute(original: &str, optimized: &str) -> Self {
        let original_length = original.chars().count();
        let optimized_length = optimized.chars().count();
        let length_difference = optimized_length as i64 - original_length as i64;
        let percentage_change = if original_length == 0 {
            0.0
        } else {
            let raw = length_difference as f64 / original_length as f64 * 100.0;
            (raw * 100.0).round() / 100.0
        };

        Self {
            original_length,
            optimized_length,
            length_difference,
            percentage_change,
            chinese_char_counts: PairCount {
                original: CHINESE_CHAR.find_iter(original).count(),
                optimized: CHINESE_CHAR.find_iter(optimized).count(),
            },
            english_word_counts: PairCount {
                original: english_words(original),
                optimized: english_words(optimized),
            },
        }
    }
}
