//! Phoneme Approximation
//!
//! A rule-based stand-in for phonetic transcription. Common English digraphs
//! are collapsed into a single IPA-like symbol so that "think" and "sink"
//! differ in exactly one position. This is a heuristic, not linguistics.

use crate::core::text_normalizer::{normalize, tokenize};
use crate::error::{ScoreError, ScoreResult};
use serde::{Deserialize, Serialize};

/// Token inserted between words when flattening a sequence for alignment
pub const WORD_BOUNDARY: &str = " ";

/// Default digraph table, checked in order
pub const DEFAULT_DIGRAPHS: &[(&str, &str)] = &[
    ("th", "θ"),
    ("sh", "ʃ"),
    ("ch", "tʃ"),
    ("ph", "f"),
    ("ng", "ŋ"),
    ("ck", "k"),
    ("wh", "w"),
    ("zh", "ʒ"),
    ("qu", "kw"),
];

/// Phoneme-like symbols for a piece of text, grouped by word
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhonemeSequence {
    pub words: Vec<Vec<String>>,
}

impl PhonemeSequence {
    /// Flatten into one symbol stream with a boundary token between words
    pub fn symbols_with_boundaries(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for (idx, word) in self.words.iter().enumerate() {
            if idx > 0 {
                out.push(WORD_BOUNDARY);
            }
            out.extend(word.iter().map(String::as_str));
        }
        out
    }

    /// Human-readable form, e.g. "θink ʃip" for "think ship"
    pub fn render(&self) -> String {
        self.words
            .iter()
            .map(|w| w.concat())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Applies the digraph substitution table to normalized text
#[derive(Debug, Clone)]
pub struct PhonemeApproximator {
    digraphs: Vec<([char; 2], String)>,
}

impl Default for PhonemeApproximator {
    fn default() -> Self {
        Self {
            digraphs: DEFAULT_DIGRAPHS
                .iter()
                .filter_map(|(graph, symbol)| Some((to_pair(graph)?, symbol.to_string())))
                .collect(),
        }
    }
}

impl PhonemeApproximator {
    /// Build an approximator from a custom table.
    ///
    /// Every key must be exactly two word characters and every symbol
    /// non-empty without whitespace.
    pub fn with_table(table: &[(String, String)]) -> ScoreResult<Self> {
        let mut digraphs = Vec::with_capacity(table.len());
        for (graph, symbol) in table {
            let lowered = graph.to_lowercase();
            // Keys are matched against normalized text
            if normalize(&lowered) != lowered {
                return Err(ScoreError::Config(format!(
                    "phoneme digraph '{}' contains characters normalization removes",
                    graph
                )));
            }
            let pair = to_pair(&lowered).ok_or_else(|| {
                ScoreError::Config(format!(
                    "phoneme digraph '{}' must be exactly two characters",
                    graph
                ))
            })?;
            if symbol.is_empty() {
                return Err(ScoreError::Config(format!(
                    "phoneme digraph '{}' maps to an empty symbol",
                    graph
                )));
            }
            if symbol.chars().any(char::is_whitespace) {
                return Err(ScoreError::Config(format!(
                    "phoneme symbol '{}' for '{}' must not contain whitespace",
                    symbol, graph
                )));
            }
            digraphs.push((pair, symbol.clone()));
        }
        Ok(Self { digraphs })
    }

    /// Approximate the phonemes of `text`
    pub fn approximate(&self, text: &str) -> PhonemeSequence {
        let normalized = normalize(text);
        let words = tokenize(&normalized)
            .into_iter()
            .map(|word| self.approximate_word(word))
            .collect();
        PhonemeSequence { words }
    }

    fn approximate_word(&self, word: &str) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        let mut symbols = Vec::with_capacity(chars.len());
        let mut i = 0;

        while i < chars.len() {
            if i + 1 < chars.len() {
                let pair = [chars[i], chars[i + 1]];
                if let Some((_, symbol)) = self.digraphs.iter().find(|(g, _)| *g == pair) {
                    symbols.push(symbol.clone());
                    i += 2;
                    continue;
                }
            }
            symbols.push(chars[i].to_string());
            i += 1;
        }

        symbols
    }
}

fn to_pair(graph: &str) -> Option<[char; 2]> {
    let mut chars = graph.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(first), Some(second), None) => Some([first, second]),
        _ => None,
    }
}
