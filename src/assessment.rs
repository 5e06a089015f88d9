//! Assessment Pipeline
//!
//! Connects a transcriber, the scorer and the feedback layer: one recording
//! (or an already recognized transcript) in, one report out. Also aggregates
//! reports for the end-of-test summary and instructor analytics.

use crate::asr::Transcriber;
use crate::core::scoring::{round2, Mispronunciation, PhonemeScore, ScoreBand, Scorer};
use crate::error::{ScoreError, ScoreResult};
use crate::rag::chatbot::ChatContext;
use crate::rag::explanation::generate_explanation;
use crate::rag::knowledge::KnowledgeBase;
use crate::rag::retriever::{retrieve_context, RetrievalQuery};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of one assessed utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub expected_text: String,
    pub spoken_text: String,
    /// Weighted composite of word and phoneme scores
    pub score: f64,
    pub band: ScoreBand,
    pub word_score: f64,
    pub phoneme_score: f64,
    pub missing_words: Vec<String>,
    pub extra_words: Vec<String>,
    pub phonemes: PhonemeScore,
    pub mispronunciations: Vec<Mispronunciation>,
    pub explanation: String,
    pub guidance: Vec<String>,
    pub assessed_at: String,
}

impl AssessmentReport {
    /// The view of this report the guidance chatbot works from
    pub fn chat_context(&self) -> ChatContext {
        ChatContext {
            word_score: Some(self.word_score),
            phoneme_score: Some(self.phoneme_score),
            score: Some(self.score),
            explanation: Some(self.explanation.clone()),
            missing_words: self.missing_words.clone(),
            extra_words: self.extra_words.clone(),
        }
    }
}

/// Scores submissions and attaches explanation and guidance
#[derive(Debug, Clone)]
pub struct Assessor {
    scorer: Scorer,
    kb: KnowledgeBase,
    max_results: usize,
}

impl Assessor {
    pub fn new(scorer: Scorer, kb: KnowledgeBase) -> Self {
        Self {
            scorer,
            kb,
            max_results: 0,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Assess text that has already been recognized
    pub fn assess_transcript(&self, expected: &str, spoken: &str) -> AssessmentReport {
        let card = self.scorer.assess(expected, spoken);

        let explanation = generate_explanation(
            expected,
            spoken,
            card.word.score,
            &card.word.missing_words,
            &card.word.extra_words,
            Some(card.phoneme.score),
        );

        let query = RetrievalQuery {
            score: card.composite,
            missing_words: &card.word.missing_words,
            extra_words: &card.word.extra_words,
            phoneme_score: Some(card.phoneme.score),
        };
        let guidance = retrieve_context(&self.kb, &query, self.max_results);

        AssessmentReport {
            id: None,
            expected_text: expected.to_string(),
            spoken_text: spoken.to_string(),
            score: card.composite,
            band: card.band,
            word_score: card.word.score,
            phoneme_score: card.phoneme.score,
            missing_words: card.word.missing_words,
            extra_words: card.word.extra_words,
            phonemes: card.phoneme,
            mispronunciations: card.mispronunciations,
            explanation,
            guidance,
            assessed_at: Local::now().to_rfc3339(),
        }
    }

    /// Transcribe `audio` and assess the result against `expected`
    pub async fn assess_speech(
        &self,
        transcriber: &dyn Transcriber,
        expected: &str,
        audio: &Path,
        language: Option<&str>,
    ) -> ScoreResult<AssessmentReport> {
        if !audio.is_file() {
            return Err(ScoreError::InvalidInput(format!(
                "Audio file not found: {}",
                audio.display()
            )));
        }

        let transcript = transcriber
            .transcribe(audio, language)
            .await
            .map_err(|e| match e {
                ScoreError::Transcription(msg) => ScoreError::Transcription(msg),
                other => ScoreError::Transcription(other.to_string()),
            })?;

        let spoken = transcript.text.trim();
        if spoken.is_empty() {
            warn!("⚠️ Transcriber returned no text for {}", audio.display());
        }
        info!("📝 Heard: '{}'", spoken);

        Ok(self.assess_transcript(expected, spoken))
    }
}

/// End-of-test aggregate over a set of scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub count: usize,
    pub average: Option<f64>,
    pub band: Option<ScoreBand>,
    pub best: Option<f64>,
    pub worst: Option<f64>,
}

impl SessionSummary {
    pub fn from_reports(reports: &[AssessmentReport]) -> Self {
        let scores: Vec<f64> = reports.iter().map(|r| r.score).collect();
        Self::from_scores(&scores)
    }

    pub fn from_scores(scores: &[f64]) -> Self {
        let average = mean(scores.iter().copied());
        Self {
            count: scores.len(),
            average,
            band: average.map(ScoreBand::from_score),
            best: scores.iter().copied().reduce(f64::max),
            worst: scores.iter().copied().reduce(f64::min),
        }
    }
}

/// Average score per topic, for the instructor analytics view
pub fn topic_averages<I, S>(results: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (topic, score) in results {
        grouped.entry(topic.into()).or_default().push(score);
    }

    grouped
        .into_iter()
        .filter_map(|(topic, scores)| Some((topic, mean(scores.into_iter())?)))
        .collect()
}

fn mean(scores: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = scores.fold((0.0, 0usize), |(sum, n), s| (sum + s, n + 1));
    if count == 0 {
        None
    } else {
        Some(round2(sum / count as f64))
    }
}
