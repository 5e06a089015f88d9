//! Ollama AI Integration
//!
//! Rewrites rule-based guidance into a conversational answer through a local
//! Ollama server. The model only ever sees context the crate already produced.

use crate::config::OllamaConfig;
use crate::error::{ScoreError, ScoreResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection attempts before giving up on an unreachable server
const MAX_RETRIES: u32 = 3;

/// A text completion service
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete `prompt` and return the model's answer
    async fn complete(&self, prompt: &str) -> ScoreResult<String>;
}

/// Ollama API response
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Handles Ollama LLM requests
#[derive(Clone)]
pub struct OllamaChat {
    client: reqwest::Client,
    url: String,
    model: String,
    timeout: Duration,
}

impl OllamaChat {
    /// Create new Ollama client from config
    pub fn new(config: &OllamaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Health check - verify Ollama is reachable
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/api/tags", self.url))
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn send_generate(&self, prompt: &str) -> ScoreResult<reqwest::Response> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": 0.1
            }
        });

        for attempt in 1..=MAX_RETRIES {
            match self
                .client
                .post(format!("{}/api/generate", self.url))
                .json(&body)
                .timeout(self.timeout)
                .send()
                .await
            {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_connect() && attempt < MAX_RETRIES => {
                    warn!(
                        "⚠️ Ollama retry {}/{} at {}: {}",
                        attempt, MAX_RETRIES, self.url, e
                    );
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                Err(e) if e.is_connect() => {
                    return Err(ScoreError::Llm(format!(
                        "Could not reach Ollama at {}. Is it running?",
                        self.url
                    )));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ScoreError::Llm(format!(
            "Ollama request failed after {} retries",
            MAX_RETRIES
        )))
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn complete(&self, prompt: &str) -> ScoreResult<String> {
        let response = self.send_generate(prompt).await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            return Err(ScoreError::Llm(format!(
                "Ollama API error ({}): {}",
                status, body_text
            )));
        }

        debug!("🧠 Ollama raw body: {}", body_text);

        let parsed: OllamaResponse = serde_json::from_str(&body_text).map_err(|e| {
            ScoreError::Llm(format!("Failed to deserialize Ollama response: {}", e))
        })?;

        Ok(parsed.response.trim().to_string())
    }
}
