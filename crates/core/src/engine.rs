//! The triage engine — a strict three-tier waterfall.
//!
//! Tiers are attempted in fixed priority order: dataset lookup, then the
//! remote reasoning call, then the static keyword rules. The first tier that
//! produces a verdict wins; later tiers are never consulted. The rule tier is
//! total, so `triage` always returns a verdict and never errors.

use crate::dataset::SymptomIndex;
use crate::reasoning::ReasoningClient;
use crate::rules::{self, ConditionRule};
use crate::{normalize, CoreConfig, TriageResult};
use mediaid_types::TriageVerdict;

/// Orchestrator over the three matching tiers.
///
/// Owns no persistent state: the index and catalog are read-only after
/// construction, and history persistence is the caller's responsibility so
/// the decision function stays pure and independently testable.
#[derive(Debug, Clone)]
pub struct TriageEngine {
    index: SymptomIndex,
    catalog: Vec<ConditionRule>,
    reasoning: Option<ReasoningClient>,
}

impl TriageEngine {
    /// Builds an engine from explicitly injected parts.
    pub fn new(
        index: SymptomIndex,
        catalog: Vec<ConditionRule>,
        reasoning: Option<ReasoningClient>,
    ) -> Self {
        Self {
            index,
            catalog,
            reasoning,
        }
    }

    /// Builds an engine from startup configuration.
    ///
    /// Loads the dataset when one is configured (malformed data is a fatal
    /// startup error) and enables the reasoning tier when credentials are
    /// present. The built-in condition catalog is always available as the
    /// terminal fallback.
    ///
    /// # Errors
    ///
    /// Returns `TriageError` if the dataset file is present but malformed, or
    /// if the reasoning HTTP client cannot be constructed.
    pub fn from_config(config: &CoreConfig) -> TriageResult<Self> {
        let index = match config.dataset_file() {
            Some(path) => SymptomIndex::load(path)?,
            None => SymptomIndex::empty(),
        };

        let reasoning = match config.reasoning() {
            Some(cfg) => Some(ReasoningClient::new(cfg)?),
            None => {
                tracing::info!("no reasoning credential configured, reasoning tier disabled");
                None
            }
        };

        Ok(Self::new(index, rules::default_catalog(), reasoning))
    }

    /// Classifies raw symptom text into a verdict.
    ///
    /// Total over all inputs, including empty or garbage text. Does not
    /// persist anything; callers append to the history store themselves.
    pub async fn triage(&self, raw_text: &str) -> TriageVerdict {
        let text = normalize(raw_text);

        if let Some(verdict) = self.index.best_match(&text) {
            tracing::debug!(severity = %verdict.severity, "dataset tier matched");
            return verdict;
        }

        if let Some(client) = &self.reasoning {
            if let Some(verdict) = client.classify(&text).await {
                tracing::debug!(severity = %verdict.severity, "reasoning tier matched");
                return verdict;
            }
        }

        let verdict = rules::match_rules(&text, &self.catalog);
        tracing::debug!(severity = %verdict.severity, "rule tier matched");
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetRow;
    use mediaid_types::SeverityTier;

    fn engine_with_rows(rows: Vec<DatasetRow>) -> TriageEngine {
        TriageEngine::new(
            SymptomIndex::from_rows(rows),
            rules::default_catalog(),
            None,
        )
    }

    fn fever_row() -> DatasetRow {
        DatasetRow {
            symptom: "fever".into(),
            disease: "Influenza".into(),
            risk_level: SeverityTier::Moderate,
        }
    }

    #[tokio::test]
    async fn dataset_tier_outranks_rule_tier() {
        // "cough" appears in both the dataset and the mild rule keywords;
        // the dataset verdict must win.
        let engine = engine_with_rows(vec![DatasetRow {
            symptom: "cough".into(),
            disease: "Bronchitis".into(),
            risk_level: SeverityTier::Moderate,
        }]);

        let verdict = engine.triage("a nasty cough").await;
        assert_eq!(verdict.disease, "Bronchitis");
        assert_eq!(verdict.severity, SeverityTier::Moderate);
    }

    #[tokio::test]
    async fn falls_through_to_rules_without_dataset_match() {
        let engine = engine_with_rows(vec![fever_row()]);

        let verdict = engine.triage("I have chest pain").await;
        assert_eq!(verdict.severity, SeverityTier::Severe);
        assert!(verdict.disease.is_empty());
    }

    #[tokio::test]
    async fn dataset_tie_break_prefers_higher_risk() {
        let engine = engine_with_rows(vec![
            fever_row(),
            DatasetRow {
                symptom: "stiff neck".into(),
                disease: "Meningitis".into(),
                risk_level: SeverityTier::Severe,
            },
        ]);

        let verdict = engine.triage("fever and a stiff neck").await;
        assert_eq!(verdict.severity, SeverityTier::Severe);
        assert_eq!(verdict.disease, "Meningitis");
    }

    #[tokio::test]
    async fn normalization_makes_case_and_whitespace_irrelevant() {
        let engine = engine_with_rows(vec![fever_row()]);

        let upper = engine.triage("FEVER").await;
        let padded = engine.triage("  fever  ").await;
        assert_eq!(upper, padded);
        assert_eq!(upper.disease, "Influenza");
    }

    #[tokio::test]
    async fn triage_is_total_over_garbage_input() {
        let engine = engine_with_rows(vec![]);

        for input in ["", "   \t ", "\u{0000}\u{fffd}£€", "!!??!!"] {
            let verdict = engine.triage(input).await;
            assert!(!verdict.advice.as_str().is_empty());
            assert!(matches!(
                verdict.severity,
                SeverityTier::Mild | SeverityTier::Moderate | SeverityTier::Severe
            ));
        }
    }

    #[tokio::test]
    async fn disease_stays_empty_unless_a_matcher_names_one() {
        let engine = engine_with_rows(vec![]);
        let verdict = engine.triage("high fever and vomiting").await;
        assert_eq!(verdict.severity, SeverityTier::Moderate);
        assert!(verdict.disease.is_empty());
    }
}
