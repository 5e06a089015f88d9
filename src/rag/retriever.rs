//! Context Retrieval
//!
//! Picks the knowledge entries relevant to one assessment outcome.

use crate::core::scoring::GOOD_THRESHOLD;
use crate::rag::knowledge::{
    KnowledgeBase, TOPIC_COMMON_ERRORS, TOPIC_EXTRA_WORDS, TOPIC_IMPROVEMENT, TOPIC_LOW_SCORE,
    TOPIC_MISSING_WORDS, TOPIC_PHONEME_RULES, TOPIC_THERAPY_TIPS,
};
use tracing::debug;

/// What the retriever needs to know about an attempt
#[derive(Debug, Clone, Copy)]
pub struct RetrievalQuery<'a> {
    pub score: f64,
    pub missing_words: &'a [String],
    pub extra_words: &'a [String],
    pub phoneme_score: Option<f64>,
}

/// Topics relevant to `query`
pub fn select_topics(query: &RetrievalQuery<'_>) -> Vec<&'static str> {
    let mut topics = Vec::new();

    if query.score < GOOD_THRESHOLD {
        topics.push(TOPIC_LOW_SCORE);
    }
    if !query.missing_words.is_empty() {
        topics.push(TOPIC_MISSING_WORDS);
    }
    if !query.extra_words.is_empty() {
        topics.push(TOPIC_EXTRA_WORDS);
    }
    if !query.missing_words.is_empty() || !query.extra_words.is_empty() {
        topics.push(TOPIC_COMMON_ERRORS);
    }
    if query.phoneme_score.is_some_and(|s| s < GOOD_THRESHOLD) {
        topics.push(TOPIC_PHONEME_RULES);
    }
    topics.push(TOPIC_IMPROVEMENT);
    topics.push(TOPIC_THERAPY_TIPS);

    topics
}

/// Contents of matching entries, in knowledge-base order.
///
/// `max_results == 0` returns every match.
pub fn retrieve_context(
    kb: &KnowledgeBase,
    query: &RetrievalQuery<'_>,
    max_results: usize,
) -> Vec<String> {
    let topics = select_topics(query);
    debug!("🔎 Retrieval topics: {:?}", topics);

    let limit = if max_results == 0 {
        usize::MAX
    } else {
        max_results
    };

    kb.entries()
        .iter()
        .filter(|entry| topics.iter().any(|t| *t == entry.topic))
        .take(limit)
        .map(|entry| entry.content.clone())
        .collect()
}
