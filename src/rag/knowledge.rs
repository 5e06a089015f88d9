//! Pronunciation Knowledge
//!
//! Topic-tagged snippets that ground guidance answers. A small set ships with
//! the crate; therapists can add their own paragraphs as plain text files.

use crate::error::{ScoreError, ScoreResult};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Knowledge files read from a knowledge directory, in load order
pub const KNOWLEDGE_FILES: &[&str] = &["common_errors.txt", "phoneme_rules.txt", "therapy_tips.txt"];

pub const TOPIC_MISSING_WORDS: &str = "missing_words";
pub const TOPIC_EXTRA_WORDS: &str = "extra_words";
pub const TOPIC_LOW_SCORE: &str = "low_score";
pub const TOPIC_IMPROVEMENT: &str = "improvement";
pub const TOPIC_COMMON_ERRORS: &str = "common_errors";
pub const TOPIC_PHONEME_RULES: &str = "phoneme_rules";
pub const TOPIC_THERAPY_TIPS: &str = "therapy_tips";

/// One retrievable unit of knowledge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub topic: String,
    pub content: String,
}

impl KnowledgeEntry {
    pub fn new(topic: &str, content: &str) -> Self {
        Self {
            topic: topic.to_string(),
            content: content.to_string(),
        }
    }
}

/// Ordered collection of knowledge entries
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// The entries that ship with the crate
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                KnowledgeEntry::new(
                    TOPIC_MISSING_WORDS,
                    "Missing words indicate that the learner skipped or unclear pronounced certain sounds. Slow repetition helps.",
                ),
                KnowledgeEntry::new(
                    TOPIC_EXTRA_WORDS,
                    "Extra words often occur due to incorrect segmentation or stress placement.",
                ),
                KnowledgeEntry::new(
                    TOPIC_LOW_SCORE,
                    "Low pronunciation score suggests multiple phonetic deviations from the target phrase.",
                ),
                KnowledgeEntry::new(
                    TOPIC_IMPROVEMENT,
                    "Practice by breaking the phrase into syllables and repeating slowly.",
                ),
            ],
        }
    }

    /// Built-in entries followed by whatever `dir` provides
    pub fn with_dir(dir: &Path) -> ScoreResult<Self> {
        let mut kb = Self::builtin();
        kb.load_dir(dir)?;
        Ok(kb)
    }

    /// Append paragraph chunks from the knowledge files in `dir`.
    ///
    /// Each chunk is tagged with its file stem. Missing files are skipped.
    /// Returns the number of chunks added.
    pub fn load_dir(&mut self, dir: &Path) -> ScoreResult<usize> {
        let mut added = 0;

        for fname in KNOWLEDGE_FILES {
            let path = dir.join(fname);
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!("⚠️ Knowledge file missing -> {}", fname);
                    continue;
                }
                Err(e) => {
                    return Err(ScoreError::Knowledge(format!(
                        "failed to read {}: {}",
                        path.display(),
                        e
                    )));
                }
            };

            let topic = fname.trim_end_matches(".txt");
            let before = self.entries.len();
            self.entries.extend(
                split_paragraphs(&content)
                    .into_iter()
                    .map(|chunk| KnowledgeEntry::new(topic, chunk)),
            );
            let count = self.entries.len() - before;
            debug!("📚 Loaded {} chunks from {}", count, fname);
            added += count;
        }

        Ok(added)
    }

    pub fn push(&mut self, entry: KnowledgeEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry is tagged with `topic`
    pub fn has_topic(&self, topic: &str) -> bool {
        self.entries.iter().any(|e| e.topic == topic)
    }
}

/// Split text on blank lines into trimmed, non-empty chunks
fn split_paragraphs(content: &str) -> Vec<&str> {
    content
        .trim()
        .split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}
