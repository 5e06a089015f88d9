//! Guidance Chatbot
//!
//! Answers a learner's question about an attempt. The answer has three parts:
//! a direct reply keyed on the question, the system explanation, and retrieved
//! therapy guidance. An optional language model may rephrase the result, but
//! it only ever sees that grounded answer as context.

use crate::core::ollama::ChatModel;
use crate::core::scoring::{composite_score, Weights};
use crate::rag::explanation::format_score;
use crate::rag::knowledge::KnowledgeBase;
use crate::rag::retriever::{retrieve_context, RetrievalQuery};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The parts of an assessment result the chatbot reads.
///
/// Every field is optional so partially stored results still get an answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatContext {
    pub word_score: Option<f64>,
    pub phoneme_score: Option<f64>,
    /// Overall score; computed from the parts when absent
    pub score: Option<f64>,
    pub explanation: Option<String>,
    pub missing_words: Vec<String>,
    pub extra_words: Vec<String>,
}

/// Rule-based answer using default weights and no result cap
pub fn rag_chatbot(question: &str, ctx: &ChatContext, kb: &KnowledgeBase) -> String {
    build_answer(question, ctx, kb, Weights::default(), 0)
}

fn build_answer(
    question: &str,
    ctx: &ChatContext,
    kb: &KnowledgeBase,
    weights: Weights,
    max_results: usize,
) -> String {
    let word_score = ctx.word_score.unwrap_or(0.0);
    let phoneme_score = ctx.phoneme_score;
    let score = ctx
        .score
        .unwrap_or_else(|| composite_score(word_score, phoneme_score, weights));

    let user_q = question.to_lowercase();
    let mut response = vec!["💡 Direct Answer:".to_string()];

    if user_q.contains("why") {
        response.push(format!(
            "You lost marks because your spoken pronunciation did not fully \
             match the expected word and sound patterns. \
             Your overall score was {}%.",
            format_score(score)
        ));
        response.push(format!("Word accuracy: {}%.", format_score(word_score)));
        if let Some(phoneme_score) = phoneme_score {
            response.push(format!(
                "Phoneme-level accuracy: {}%.",
                format_score(phoneme_score)
            ));
        }
    } else if user_q.contains("improve") || user_q.contains("how") {
        response.push(
            "To improve your pronunciation, speak slowly, exaggerate mouth \
             movements initially, and repeat the word while focusing on \
             individual sounds."
                .to_string(),
        );
    } else {
        response.push("Your pronunciation attempt has been evaluated in detail below.".to_string());
    }

    response.push("\n🧠 System Explanation:".to_string());
    response.push(
        ctx.explanation
            .clone()
            .unwrap_or_else(|| "No explanation available.".to_string()),
    );

    response.push("\n📚 Therapy Guidance:".to_string());
    let query = RetrievalQuery {
        score,
        missing_words: &ctx.missing_words,
        extra_words: &ctx.extra_words,
        phoneme_score,
    };
    let retrieved = retrieve_context(kb, &query, max_results);
    if retrieved.is_empty() {
        response.push("- No specific therapy guidance required.".to_string());
    } else {
        response.extend(retrieved.into_iter().map(|item| format!("- {}", item)));
    }

    response.join("\n")
}

/// Prompt that restricts the model to the grounded answer
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        r#"You are a pronunciation tutor helping a language learner.

Use ONLY the information provided in the assessment notes below.
If the answer is not present, say:
"I don't know based on this assessment."

Assessment notes:
{context}

Question:
{question}

Answer clearly and concisely."#
    )
}

/// Question answering over one assessment, with an optional model rewrite
#[derive(Clone)]
pub struct GuidanceAssistant {
    kb: KnowledgeBase,
    weights: Weights,
    max_results: usize,
    model: Option<Arc<dyn ChatModel>>,
}

impl GuidanceAssistant {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self {
            kb,
            weights: Weights::default(),
            max_results: 0,
            model: None,
        }
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// The rule-based answer, never touching the model
    pub fn answer_offline(&self, question: &str, ctx: &ChatContext) -> String {
        build_answer(question, ctx, &self.kb, self.weights, self.max_results)
    }

    /// Answer `question`, preferring the model when one is configured.
    ///
    /// Model failures fall back to the rule-based answer.
    pub async fn answer(&self, question: &str, ctx: &ChatContext) -> String {
        let grounded = self.answer_offline(question, ctx);

        let Some(model) = &self.model else {
            return grounded;
        };

        let prompt = build_prompt(&grounded, question);
        match model.complete(&prompt).await {
            Ok(reply) if !reply.trim().is_empty() => {
                info!("🧠 Guidance answered by language model");
                debug!("Model reply: {}", reply);
                reply
            }
            Ok(_) => {
                warn!("⚠️ Language model returned an empty answer, using rule-based guidance");
                grounded
            }
            Err(e) => {
                warn!("⚠️ Language model unavailable, using rule-based guidance: {}", e);
                grounded
            }
        }
    }
}
