//! Text Normalization
//!
//! Brings expected and recognized text into the same shape before alignment.
//! ASR output and instructor-authored prompts disagree on case, punctuation and
//! spacing far more often than on actual words.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s]").expect("valid punctuation regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
}

/// Normalize text for fair comparison.
///
/// Lowercases, drops every character that is neither a word character nor
/// whitespace, and collapses whitespace runs to a single space.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(lowered.trim(), "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Split normalized text into word tokens
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}
