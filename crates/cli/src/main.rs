//! MediAid command-line interface.
//!
//! One-shot triage from the shell plus history inspection. Reads the same
//! environment variables as the REST server (`MEDIAID_DATASET_FILE`,
//! `MEDIAID_HISTORY_FILE`, `OPENAI_API_KEY`, ...), so both entry points
//! share one dataset and one history file.

use clap::{Parser, Subcommand};
use mediaid_core::{
    config::{DEFAULT_HISTORY_FILE, DEFAULT_REASONING_TIMEOUT_SECS},
    CoreConfig, HistoryStore, ReasoningConfig, TriageEngine,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediaid")]
#[command(about = "MediAid symptom triage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Triage a symptom description and record it in the history
    Triage {
        /// Free-text symptom description, e.g. "fever and cough for 3 days"
        text: String,
    },
    /// Show recorded triage requests, newest first
    History {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn resolve_config() -> anyhow::Result<CoreConfig> {
    let dataset_file = CoreConfig::resolve_dataset_file(
        std::env::var("MEDIAID_DATASET_FILE").ok().map(PathBuf::from),
    );
    let history_file = PathBuf::from(
        std::env::var("MEDIAID_HISTORY_FILE").unwrap_or_else(|_| DEFAULT_HISTORY_FILE.into()),
    );

    let reasoning = match std::env::var("OPENAI_API_KEY") {
        Ok(api_key) => {
            let timeout_secs = std::env::var("MEDIAID_REASONING_TIMEOUT_SECS")
                .ok()
                .map(|v| v.parse::<u64>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("invalid MEDIAID_REASONING_TIMEOUT_SECS: {e}"))?
                .unwrap_or(DEFAULT_REASONING_TIMEOUT_SECS);
            Some(ReasoningConfig::new(
                api_key,
                std::env::var("OPENAI_API_BASE").ok(),
                std::env::var("MEDIAID_REASONING_MODEL").ok(),
                Some(timeout_secs),
            )?)
        }
        Err(_) => None,
    };

    Ok(CoreConfig::new(dataset_file, history_file, reasoning)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = resolve_config()?;

    match cli.command {
        Commands::Triage { text } => {
            let engine = TriageEngine::from_config(&cfg)?;
            let verdict = engine.triage(&text).await;

            println!("Severity: {} ({})", verdict.severity, verdict.severity.label());
            if !verdict.disease.is_empty() {
                println!("Possible disease: {}", verdict.disease);
            }
            println!("Advice: {}", verdict.advice);

            // The CLI user asked to record; unlike the REST endpoint, a
            // failed append is reported as an error here.
            let store = HistoryStore::new(cfg.history_file());
            store.append(&text, &verdict)?;
        }
        Commands::History { limit } => {
            let store = HistoryStore::new(cfg.history_file());
            let mut entries = store.all()?;
            entries.reverse();
            if let Some(limit) = limit {
                entries.truncate(limit);
            }

            if entries.is_empty() {
                println!("No triage history yet.");
            } else {
                for entry in entries {
                    let disease = if entry.disease.is_empty() {
                        String::new()
                    } else {
                        format!(" | Disease: {}", entry.disease)
                    };
                    println!(
                        "[{}] {} | Symptoms: {} | Advice: {}{}",
                        entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                        entry.severity,
                        entry.symptoms,
                        entry.advice,
                        disease
                    );
                }
            }
        }
    }

    Ok(())
}
