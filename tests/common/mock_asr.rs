//! Mock Transcriber for Testing
//!
//! Provides controlled transcripts for pipeline tests.

use async_trait::async_trait;
use speechscore::asr::{Transcriber, Transcript};
use speechscore::error::{ScoreError, ScoreResult};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock transcriber that returns predetermined transcripts
pub struct MockTranscriber {
    /// Queue of transcripts to return
    pub responses: Mutex<Vec<Transcript>>,
    /// Fail every call with this message
    failure: Option<String>,
    /// Record every (audio, language) request for verification
    pub requests: Arc<Mutex<Vec<(PathBuf, Option<String>)>>>,
}

impl MockTranscriber {
    pub fn new(responses: Vec<Transcript>) -> Self {
        Self {
            responses: Mutex::new(responses),
            failure: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that hears a single phrase
    pub fn with_phrase(text: &str) -> Self {
        Self::new(vec![Transcript::new(text)])
    }

    /// Create a mock whose engine is always down
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &Path, language: Option<&str>) -> ScoreResult<Transcript> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((audio.to_path_buf(), language.map(str::to_string)));
        }

        if let Some(message) = &self.failure {
            return Err(ScoreError::Other(anyhow::anyhow!(message.clone())));
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| ScoreError::Transcription("mock poisoned".to_string()))?;
        if responses.is_empty() {
            Ok(Transcript::new(""))
        } else {
            Ok(responses.remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_responses_in_order() {
        let mock = MockTranscriber::new(vec![Transcript::new("one"), Transcript::new("two")]);
        let audio = Path::new("a.wav");
        let first = tokio_test::block_on(mock.transcribe(audio, None)).unwrap();
        let second = tokio_test::block_on(mock.transcribe(audio, Some("en"))).unwrap();
        let third = tokio_test::block_on(mock.transcribe(audio, None)).unwrap();
        assert_eq!(first.text, "one");
        assert_eq!(second.text, "two");
        assert_eq!(third.text, "");
        assert_eq!(mock.requests.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_failing_mock() {
        let mock = MockTranscriber::failing("engine offline");
        let result = tokio_test::block_on(mock.transcribe(Path::new("a.wav"), None));
        assert!(result.is_err());
    }
}
