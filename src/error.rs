//! SpeechScore Error Types
//!
//! Centralized error handling for scoring, retrieval and the service seams.

use thiserror::Error;

/// Central error type for SpeechScore
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for SpeechScore operations
pub type ScoreResult<T> = Result<T, ScoreError>;

impl From<reqwest::Error> for ScoreError {
    fn from(err: reqwest::Error) -> Self {
        ScoreError::Llm(err.to_string())
    }
}
