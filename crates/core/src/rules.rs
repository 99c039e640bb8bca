//! Static condition catalog — the terminal matching tier.
//!
//! An ordered set of (keywords, severity, advice) rules scanned in listed
//! order, most severe conditions first. Unlike the dataset and reasoning
//! tiers this matcher is total: when nothing matches it falls back to a
//! hardcoded mild home-care verdict, so the triage pipeline as a whole can
//! never come up empty.

use crate::TriageResult;
use mediaid_types::{Advice, SeverityTier, TriageVerdict};

/// One static triage rule.
///
/// Invariant: at least one keyword and non-empty advice, both enforced at
/// construction.
#[derive(Debug, Clone)]
pub struct ConditionRule {
    keywords: Vec<String>,
    severity: SeverityTier,
    advice: Advice,
}

impl ConditionRule {
    /// Create a rule from lowercase keyword phrases.
    pub fn new(
        keywords: &[&str],
        severity: SeverityTier,
        advice: Advice,
    ) -> TriageResult<Self> {
        if keywords.is_empty() {
            return Err(crate::TriageError::RuleWithoutKeywords);
        }
        Ok(Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            severity,
            advice,
        })
    }

    pub fn severity(&self) -> SeverityTier {
        self.severity
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|kw| text.contains(kw.as_str()))
    }
}

/// The built-in catalog, most severe first.
pub fn default_catalog() -> Vec<ConditionRule> {
    let rule = |keywords: &[&str], severity: SeverityTier| {
        ConditionRule::new(
            keywords,
            severity,
            Advice::new(severity.default_advice()).expect("built-in advice is non-empty"),
        )
        .expect("built-in rules have keywords")
    };

    vec![
        rule(
            &[
                "chest pain",
                "shortness of breath",
                "severe bleeding",
                "unconscious",
                "stroke",
                "heart attack",
            ],
            SeverityTier::Severe,
        ),
        rule(
            &[
                "high fever",
                "vomiting",
                "dehydration",
                "severe headache",
                "confusion",
                "stiff neck",
                "difficulty breathing",
            ],
            SeverityTier::Moderate,
        ),
        rule(
            &[
                "cough",
                "runny nose",
                "mild headache",
                "mild sore throat",
                "back pain",
                "fatigue",
            ],
            SeverityTier::Mild,
        ),
    ]
}

/// Matches normalized text against the catalog in listed order.
///
/// Returns the first rule's severity and advice when any of its keywords
/// occurs as a substring; otherwise the mild home-care default. Total over
/// all inputs, including the empty string.
pub fn match_rules(text: &str, catalog: &[ConditionRule]) -> TriageVerdict {
    for rule in catalog {
        if rule.matches(text) {
            return TriageVerdict::new(rule.severity, rule.advice.clone());
        }
    }

    TriageVerdict::new(
        SeverityTier::Mild,
        Advice::new(SeverityTier::Mild.default_advice()).expect("default advice is non-empty"),
    )
}
