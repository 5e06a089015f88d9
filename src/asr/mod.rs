//! ASR (Automatic Speech Recognition) Module
//!
//! Speech-to-text is an external service. This module only defines the seam
//! the assessment pipeline calls; concrete engines live outside the crate.

use crate::error::ScoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text recognized from one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    /// Language reported by the engine, if it detects one
    pub language: Option<String>,
}

impl Transcript {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            language: None,
        }
    }
}

/// Trait for speech-to-text engines
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the recording at `audio`.
    ///
    /// `language` is a hint; engines may auto-detect when it is `None`.
    async fn transcribe(&self, audio: &Path, language: Option<&str>) -> ScoreResult<Transcript>;
}
