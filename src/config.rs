use crate::error::{ScoreError, ScoreResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub knowledge: KnowledgeConfig,
    pub ollama: OllamaConfig,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            knowledge: KnowledgeConfig::default(),
            ollama: OllamaConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

/// Weights and thresholds for the scoring engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub word_weight: f64,
    pub phoneme_weight: f64,
    /// Minimum similarity for pairing an extra word with a missing one
    pub mispronunciation_cutoff: f64,
    /// Replaces the built-in digraph table when set
    pub phoneme_table: Option<Vec<(String, String)>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            word_weight: 0.6,
            phoneme_weight: 0.4,
            mispronunciation_cutoff: 0.5,
            phoneme_table: None,
        }
    }
}

/// Where therapy knowledge lives and how much of it to surface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Directory with common_errors.txt, phoneme_rules.txt, therapy_tips.txt
    pub dir: Option<String>,
    /// 0 = unlimited
    pub max_results: usize,
}

/// Optional LLM rewrite of guidance answers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub enabled: bool,
    pub url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from `path`, or fall back to defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                // Graceful degradation: log warning and use defaults
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                // Backup corrupt file for debugging
                let backup_path = path.with_extension("json.corrupt");
                if let Err(e) = std::fs::rename(path, &backup_path) {
                    tracing::warn!(
                        "⚠️ Could not back up corrupt config to {}: {}",
                        backup_path.display(),
                        e
                    );
                }
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the scorer cannot work with
    pub fn validate(&self) -> ScoreResult<()> {
        let s = &self.scoring;
        for (name, weight) in [("word_weight", s.word_weight), ("phoneme_weight", s.phoneme_weight)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoreError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        if s.word_weight + s.phoneme_weight == 0.0 {
            return Err(ScoreError::Config(
                "word_weight and phoneme_weight cannot both be zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&s.mispronunciation_cutoff) {
            return Err(ScoreError::Config(format!(
                "mispronunciation_cutoff must be within [0, 1], got {}",
                s.mispronunciation_cutoff
            )));
        }
        if let Some(table) = &s.phoneme_table {
            crate::core::phoneme::PhonemeApproximator::with_table(table)?;
        }
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("speechscore")
        .join("config.json")
}
