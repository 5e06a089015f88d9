//! SpeechScore Library
//!
//! Pronunciation scoring for speech assessments: text and phoneme alignment,
//! composite scoring, explanations and retrieval-grounded guidance.

pub mod asr;
pub mod assessment;
pub mod config;
pub mod core;
pub mod error;
pub mod rag;
pub mod utils;

pub use assessment::{AssessmentReport, Assessor, SessionSummary};
pub use config::Config;
pub use error::{ScoreError, ScoreResult};
