//! Mock Language Model for Testing

use async_trait::async_trait;
use speechscore::core::ollama::ChatModel;
use speechscore::error::{ScoreError, ScoreResult};
use std::sync::Mutex;

/// Chat model that answers with a fixed reply and records prompts
pub struct MockChat {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A model that is never reachable
    pub fn offline() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ChatModel for MockChat {
    async fn complete(&self, prompt: &str) -> ScoreResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply
            .clone()
            .ok_or_else(|| ScoreError::Llm("connection refused".to_string()))
    }
}
