//! Core processing modules
//!
//! Contains text normalization, sequence alignment, phoneme approximation,
//! scoring and the LLM integration used for guidance answers.

pub mod alignment;
pub mod ollama;
pub mod phoneme;
pub mod scoring;
pub mod text_normalizer;

pub use scoring::{ScoreBand, ScoreCard, Scorer};
