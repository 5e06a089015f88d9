//! SpeechScore - Pronunciation Scoring CLI
//!
//! Scores recognized speech against expected text and explains the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use speechscore::assessment::{AssessmentReport, Assessor, SessionSummary};
use speechscore::config::{config_path, Config};
use speechscore::core::ollama::OllamaChat;
use speechscore::core::scoring::Scorer;
use speechscore::rag::explanation::format_score;
use speechscore::rag::{GuidanceAssistant, KnowledgeBase};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score recognized text against the expected text
    Score {
        #[arg(short, long)]
        expected: String,
        #[arg(short, long)]
        actual: String,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the feedback explanation for an attempt
    Explain {
        #[arg(short, long)]
        expected: String,
        #[arg(short, long)]
        actual: String,
    },

    /// Ask a question about an attempt
    Ask {
        #[arg(short, long)]
        expected: String,
        #[arg(short, long)]
        actual: String,
        #[arg(short, long)]
        question: String,
        /// Rephrase the answer with the configured Ollama model
        #[arg(long)]
        llm: bool,
    },

    /// Show the phoneme approximation of some text
    Phonemes { text: String },

    /// Score a JSON array of {id?, expected, actual} items
    Batch { file: PathBuf },

    /// Write the default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Deserialize)]
struct BatchItem {
    id: Option<String>,
    expected: String,
    actual: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging before the config loads so its warnings are not lost.
    // RUST_LOG wins, then --verbose, then the config file's log_level.
    let from_env = EnvFilter::try_from_default_env().ok();
    let pinned = from_env.is_some() || args.verbose;
    let initial = from_env
        .unwrap_or_else(|| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    let (filter, filter_handle) = reload::Layer::new(initial);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    let path = args.config.clone().unwrap_or_else(config_path);
    let config = Config::load_from(&path)?;

    if !pinned {
        match EnvFilter::try_new(&config.log_level) {
            Ok(level) => filter_handle.reload(level)?,
            Err(e) => warn!("⚠️ Invalid log_level '{}', keeping info: {}", config.log_level, e),
        }
    }

    debug!("🗣️ SpeechScore v{} using {}", env!("CARGO_PKG_VERSION"), path.display());

    match args.command {
        Command::InitConfig { force } => init_config(&path, force)?,
        Command::Score {
            expected,
            actual,
            json,
        } => {
            let report = build_assessor(&config)?.assess_transcript(&expected, &actual);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Command::Explain { expected, actual } => {
            let report = build_assessor(&config)?.assess_transcript(&expected, &actual);
            println!("{}", report.explanation);
        }
        Command::Ask {
            expected,
            actual,
            question,
            llm,
        } => {
            let assessor = build_assessor(&config)?;
            let report = assessor.assess_transcript(&expected, &actual);

            let mut assistant = GuidanceAssistant::new(assessor.knowledge().clone())
                .with_weights(assessor.scorer().weights())
                .with_max_results(config.knowledge.max_results);
            if llm || config.ollama.enabled {
                info!("🧠 Using Ollama model '{}'", config.ollama.model);
                assistant = assistant.with_model(Arc::new(OllamaChat::new(&config.ollama)));
            }

            println!("{}", assistant.answer(&question, &report.chat_context()).await);
        }
        Command::Phonemes { text } => {
            config.validate()?;
            let scorer = Scorer::from_config(&config.scoring)?;
            println!("{}", scorer.approximator().approximate(&text).render());
        }
        Command::Batch { file } => {
            run_batch(&build_assessor(&config)?, &file)?;
        }
    }

    Ok(())
}

fn build_assessor(config: &Config) -> Result<Assessor> {
    config.validate()?;
    let scorer = Scorer::from_config(&config.scoring)?;
    let kb = load_knowledge(config)?;
    Ok(Assessor::new(scorer, kb).with_max_results(config.knowledge.max_results))
}

fn load_knowledge(config: &Config) -> Result<KnowledgeBase> {
    match &config.knowledge.dir {
        Some(dir) => {
            let kb = KnowledgeBase::with_dir(Path::new(dir))
                .with_context(|| format!("Failed to load knowledge from {}", dir))?;
            info!("📚 Knowledge base ready: {} entries", kb.len());
            Ok(kb)
        }
        None => Ok(KnowledgeBase::builtin()),
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save_to(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn run_batch(assessor: &Assessor, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let items: Vec<BatchItem> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid batch file {}", file.display()))?;

    info!("📋 Scoring {} submissions", items.len());

    let reports: Vec<AssessmentReport> = items
        .into_iter()
        .map(|item| {
            let mut report = assessor.assess_transcript(&item.expected, &item.actual);
            report.id = item.id;
            report
        })
        .collect();
    let summary = SessionSummary::from_reports(&reports);

    let output = serde_json::json!({
        "reports": reports,
        "summary": summary,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_report(report: &AssessmentReport) {
    println!(
        "Score: {}% ({})",
        format_score(report.score),
        report.band.as_str()
    );
    println!("Word score: {}%", format_score(report.word_score));
    println!(
        "Phoneme score: {}% ({} -> {})",
        format_score(report.phoneme_score),
        report.phonemes.expected,
        report.phonemes.actual
    );
    if !report.missing_words.is_empty() {
        println!("Missing words: {}", report.missing_words.join(", "));
    }
    if !report.extra_words.is_empty() {
        println!("Extra words: {}", report.extra_words.join(", "));
    }
    for m in &report.mispronunciations {
        println!("Likely mispronounced: {} -> {}", m.expected, m.spoken);
    }
    if !report.guidance.is_empty() {
        println!();
        for item in &report.guidance {
            println!("- {}", item);
        }
    }
}
