//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! engine and stores explicitly. Request handling never reads process-wide
//! environment variables, which keeps behaviour consistent across
//! multi-threaded runtimes and test harnesses.

use crate::{TriageError, TriageResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default dataset filename looked up relative to the working directory.
pub const DEFAULT_DATASET_FILE: &str = "symptoms_diseases.csv";
/// Default history filename looked up relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "mediaid_history.json";
/// Default remote reasoning endpoint (OpenAI-compatible chat completions).
pub const DEFAULT_REASONING_API_BASE: &str = "https://api.openai.com/v1";
/// Default reasoning model.
pub const DEFAULT_REASONING_MODEL: &str = "gpt-3.5-turbo";
/// Default bound on a single reasoning round trip.
pub const DEFAULT_REASONING_TIMEOUT_SECS: u64 = 30;

/// Settings for the remote reasoning service.
///
/// Constructed only when an access credential is configured; when absent the
/// reasoning tier is disabled rather than erroring.
#[derive(Clone, Debug)]
pub struct ReasoningConfig {
    api_key: String,
    api_base: String,
    model: String,
    timeout: Duration,
}

impl ReasoningConfig {
    /// Create a new `ReasoningConfig`.
    pub fn new(
        api_key: String,
        api_base: Option<String>,
        model: Option<String>,
        timeout_secs: Option<u64>,
    ) -> TriageResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TriageError::InvalidConfig(
                "reasoning api_key cannot be empty".into(),
            ));
        }
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_REASONING_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(TriageError::InvalidConfig(
                "reasoning timeout must be at least one second".into(),
            ));
        }

        Ok(Self {
            api_key,
            api_base: api_base
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REASONING_API_BASE.into()),
            model: model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REASONING_MODEL.into()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    dataset_file: Option<PathBuf>,
    history_file: PathBuf,
    reasoning: Option<ReasoningConfig>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `dataset_file` should already be `None` when the file does not exist:
    /// a missing dataset disables that tier and is never an error, whereas a
    /// present-but-malformed dataset fails at load time.
    pub fn new(
        dataset_file: Option<PathBuf>,
        history_file: PathBuf,
        reasoning: Option<ReasoningConfig>,
    ) -> TriageResult<Self> {
        if history_file.as_os_str().is_empty() {
            return Err(TriageError::InvalidConfig(
                "history_file cannot be empty".into(),
            ));
        }

        Ok(Self {
            dataset_file,
            history_file,
            reasoning,
        })
    }

    /// Resolve a dataset path override against the filesystem.
    ///
    /// Returns `Some` only when the file actually exists; absence disables
    /// the dataset tier for the lifetime of the process.
    pub fn resolve_dataset_file(override_path: Option<PathBuf>) -> Option<PathBuf> {
        let candidate = override_path.unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_FILE));
        if candidate.is_file() {
            Some(candidate)
        } else {
            tracing::info!(
                "dataset file not found at {}, dataset matching disabled",
                candidate.display()
            );
            None
        }
    }

    pub fn dataset_file(&self) -> Option<&Path> {
        self.dataset_file.as_deref()
    }

    pub fn history_file(&self) -> &Path {
        &self.history_file
    }

    pub fn reasoning(&self) -> Option<&ReasoningConfig> {
        self.reasoning.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasoning_config_rejects_empty_key() {
        let cfg = ReasoningConfig::new("  ".into(), None, None, None);
        assert!(matches!(cfg, Err(TriageError::InvalidConfig(_))));
    }

    #[test]
    fn reasoning_config_applies_defaults() {
        let cfg = ReasoningConfig::new("sk-test".into(), None, None, None).unwrap();
        assert_eq!(cfg.api_base(), DEFAULT_REASONING_API_BASE);
        assert_eq!(cfg.model(), DEFAULT_REASONING_MODEL);
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_REASONING_TIMEOUT_SECS));
    }

    #[test]
    fn reasoning_config_strips_trailing_slash_from_base() {
        let cfg = ReasoningConfig::new(
            "sk-test".into(),
            Some("http://localhost:8080/v1/".into()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(cfg.api_base(), "http://localhost:8080/v1");
    }

    #[test]
    fn resolve_dataset_file_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(CoreConfig::resolve_dataset_file(Some(missing)).is_none());

        let present = dir.path().join("data.csv");
        std::fs::write(&present, "symptom,disease,risk_level\n").unwrap();
        assert_eq!(
            CoreConfig::resolve_dataset_file(Some(present.clone())),
            Some(present)
        );
    }
}
