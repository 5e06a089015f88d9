//! Explanation Generation
//!
//! Turns scores and word diagnostics into plain feedback sentences.

use crate::core::scoring::ScoreBand;

/// Format a score the way reports display it: "80.0", "72.5", "66.67"
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        format!("{}", score)
    }
}

/// Build the feedback paragraph for one attempt
pub fn generate_explanation(
    expected_text: &str,
    spoken_text: &str,
    word_score: f64,
    missing_words: &[String],
    extra_words: &[String],
    phoneme_score: Option<f64>,
) -> String {
    let mut explanation = vec![
        format!("Expected phrase: {}.", expected_text),
        format!("You said: {}.", spoken_text),
    ];

    explanation.push(
        match ScoreBand::from_score(word_score) {
            ScoreBand::Excellent => "Excellent pronunciation at the word level.",
            ScoreBand::Good => "Good attempt, some word-level pronunciation issues detected.",
            ScoreBand::NeedsWork => "Word-level pronunciation needs significant improvement.",
        }
        .to_string(),
    );

    if !missing_words.is_empty() {
        explanation.push(format!(
            "Missing or unclear words: {}.",
            missing_words.join(", ")
        ));
    }

    if !extra_words.is_empty() {
        explanation.push(format!(
            "Extra or mispronounced words: {}.",
            extra_words.join(", ")
        ));
    }

    if let Some(phoneme_score) = phoneme_score {
        explanation.push(
            match ScoreBand::from_score(phoneme_score) {
                ScoreBand::Excellent => "Phoneme articulation is mostly correct.",
                ScoreBand::Good => "Some phoneme articulation issues were detected.",
                ScoreBand::NeedsWork => "Significant phoneme-level articulation issues detected.",
            }
            .to_string(),
        );
        explanation.push(format!(
            "Phoneme accuracy score: {}%.",
            format_score(phoneme_score)
        ));
    }

    explanation.join(" ")
}
