//! Pronunciation Scoring
//!
//! Compares what the learner was asked to say with what the recognizer heard.
//! Produces a word-level score, a phoneme-level score and a weighted composite,
//! plus the diagnostics the explanation layer turns into feedback.

use crate::config::ScoringConfig;
use crate::core::alignment::{char_ratio, SequenceMatcher};
use crate::core::phoneme::{PhonemeApproximator, WORD_BOUNDARY};
use crate::core::text_normalizer::{normalize, tokenize};
use crate::error::{ScoreError, ScoreResult};
use crate::utils::fuzzy::find_best_match;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Scores at or above this are excellent
pub const EXCELLENT_THRESHOLD: f64 = 80.0;
/// Scores at or above this are good
pub const GOOD_THRESHOLD: f64 = 60.0;

/// Coarse grading of a percentage score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsWork,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            ScoreBand::Excellent
        } else if score >= GOOD_THRESHOLD {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsWork
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::NeedsWork => "needs_work",
        }
    }
}

/// Word-level comparison result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordScore {
    pub score: f64,
    pub missing_words: Vec<String>,
    pub extra_words: Vec<String>,
}

/// Phoneme-level comparison result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhonemeScore {
    pub score: f64,
    /// Rendered approximation of the expected text
    pub expected: String,
    /// Rendered approximation of the recognized text
    pub actual: String,
    pub missing_phonemes: Vec<String>,
    pub extra_phonemes: Vec<String>,
}

/// An extra word paired with the expected word it most likely replaced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mispronunciation {
    pub expected: String,
    pub spoken: String,
    pub similarity: f64,
}

/// Everything the scorer knows about one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub word: WordScore,
    pub phoneme: PhonemeScore,
    pub composite: f64,
    pub band: ScoreBand,
    pub mispronunciations: Vec<Mispronunciation>,
}

/// Relative weight of the word and phoneme scores in the composite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub word: f64,
    pub phoneme: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            word: 0.6,
            phoneme: 0.4,
        }
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compare expected vs actual text and compute score + word errors.
///
/// The score is the character-level alignment ratio of the normalized texts as
/// a percentage. Missing and extra words keep their order and duplicates.
pub fn score_text(expected: &str, actual: &str) -> WordScore {
    let expected_norm = normalize(expected);
    let actual_norm = normalize(actual);

    let score = round2(char_ratio(&expected_norm, &actual_norm) * 100.0);

    let expected_words = tokenize(&expected_norm);
    let actual_words = tokenize(&actual_norm);

    let missing_words = expected_words
        .iter()
        .filter(|w| !actual_words.contains(*w))
        .map(|w| w.to_string())
        .collect();
    let extra_words = actual_words
        .iter()
        .filter(|w| !expected_words.contains(*w))
        .map(|w| w.to_string())
        .collect();

    WordScore {
        score,
        missing_words,
        extra_words,
    }
}

/// Compare the phoneme approximations of expected and actual text
pub fn score_phonemes(
    approximator: &PhonemeApproximator,
    expected: &str,
    actual: &str,
) -> PhonemeScore {
    let expected_seq = approximator.approximate(expected);
    let actual_seq = approximator.approximate(actual);

    let a = expected_seq.symbols_with_boundaries();
    let b = actual_seq.symbols_with_boundaries();
    let matcher = SequenceMatcher::new(&a, &b);

    PhonemeScore {
        score: round2(matcher.ratio() * 100.0),
        expected: expected_seq.render(),
        actual: actual_seq.render(),
        missing_phonemes: distinct_symbols(matcher.unmatched_a()),
        extra_phonemes: distinct_symbols(matcher.unmatched_b()),
    }
}

fn distinct_symbols(symbols: Vec<&&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for symbol in symbols {
        if **symbol == *WORD_BOUNDARY || out.iter().any(|s| s == *symbol) {
            continue;
        }
        out.push(symbol.to_string());
    }
    out
}

/// Weighted combination of word and phoneme scores, rounded to two places.
///
/// A missing phoneme score counts as zero.
pub fn composite_score(word_score: f64, phoneme_score: Option<f64>, weights: Weights) -> f64 {
    round2(weights.word * word_score + weights.phoneme * phoneme_score.unwrap_or(0.0))
}

/// Coarse single-word check: exact match, contained, or neither
pub fn quick_check(expected: &str, spoken: &str) -> f64 {
    let expected = expected.to_lowercase();
    let spoken = spoken.to_lowercase();
    let (expected, spoken) = (expected.trim(), spoken.trim());

    if spoken == expected {
        100.0
    } else if spoken.contains(expected) {
        80.0
    } else {
        40.0
    }
}

/// Configured scoring engine
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: Weights,
    approximator: PhonemeApproximator,
    mispronunciation_cutoff: f64,
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            approximator: PhonemeApproximator::default(),
            mispronunciation_cutoff: 0.5,
        }
    }
}

impl Scorer {
    /// Build a scorer from the scoring section of the config
    pub fn from_config(config: &ScoringConfig) -> ScoreResult<Self> {
        let weights = Weights {
            word: config.word_weight,
            phoneme: config.phoneme_weight,
        };
        if !weights.word.is_finite()
            || !weights.phoneme.is_finite()
            || weights.word < 0.0
            || weights.phoneme < 0.0
            || weights.word + weights.phoneme == 0.0
        {
            return Err(ScoreError::Config(format!(
                "invalid score weights: word={} phoneme={}",
                weights.word, weights.phoneme
            )));
        }

        let approximator = match &config.phoneme_table {
            Some(table) => PhonemeApproximator::with_table(table)?,
            None => PhonemeApproximator::default(),
        };

        Ok(Self {
            weights,
            approximator,
            mispronunciation_cutoff: config.mispronunciation_cutoff,
        })
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }

    pub fn approximator(&self) -> &PhonemeApproximator {
        &self.approximator
    }

    /// Score a recognized utterance against the expected one
    pub fn assess(&self, expected: &str, actual: &str) -> ScoreCard {
        let word = score_text(expected, actual);
        let phoneme = score_phonemes(&self.approximator, expected, actual);
        let composite = composite_score(word.score, Some(phoneme.score), self.weights);
        let mispronunciations = self.pair_mispronunciations(&word);

        debug!(
            "🎯 Scored '{}' vs '{}': word={} phoneme={} composite={}",
            expected, actual, word.score, phoneme.score, composite
        );

        ScoreCard {
            band: ScoreBand::from_score(composite),
            word,
            phoneme,
            composite,
            mispronunciations,
        }
    }

    fn pair_mispronunciations(&self, word: &WordScore) -> Vec<Mispronunciation> {
        let mut pairs: Vec<Mispronunciation> = Vec::new();
        for spoken in &word.extra_words {
            if pairs.iter().any(|p| p.spoken == *spoken) {
                continue;
            }
            if let Some(m) =
                find_best_match(spoken, &word.missing_words, self.mispronunciation_cutoff)
            {
                pairs.push(Mispronunciation {
                    expected: m.value,
                    spoken: spoken.clone(),
                    similarity: round2(m.score),
                });
            }
        }
        pairs
    }
}
