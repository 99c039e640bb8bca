//! # MediAid Core
//!
//! Decision logic for the MediAid symptom triage service.
//!
//! The core is a three-tier fallback pipeline over free-text symptom
//! descriptions:
//! 1. structured dataset lookup ([`dataset::SymptomIndex`]),
//! 2. remote reasoning call ([`reasoning::ReasoningClient`]),
//! 3. static keyword rules ([`rules`]), the terminal tier.
//!
//! [`engine::TriageEngine::triage`] runs the waterfall and always produces a
//! well-typed verdict. Persistence of request/response pairs lives in
//! [`history::HistoryStore`] and is invoked by callers, not by the engine.
//!
//! **No API concerns**: HTTP routing, serialization formats of the REST
//! boundary and process startup belong in `api-rest` and `mediaid-cli`.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod history;
pub mod reasoning;
pub mod rules;

pub use config::{CoreConfig, ReasoningConfig};
pub use engine::TriageEngine;
pub use error::{TriageError, TriageResult};
pub use history::{HistoryEntry, HistoryStore};

/// Canonical form of request text used by all three matchers: lowercased and
/// trimmed, nothing else. Keyword matching is intentionally naive substring
/// search, and results must stay reproducible, so no stemming or punctuation
/// stripping happens here.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize("  FEVER and Chills \n"), "fever and chills");
    }

    #[test]
    fn normalize_keeps_punctuation() {
        assert_eq!(normalize("Chest pain!!"), "chest pain!!");
    }

    #[test]
    fn normalize_of_empty_input_is_empty() {
        assert_eq!(normalize("   "), "");
    }
}
