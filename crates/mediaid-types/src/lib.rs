//! Shared vocabulary types for the MediAid triage pipeline.
//!
//! This crate is deliberately small: the severity enumeration, the non-empty
//! advice text type, and the verdict struct every matcher produces. Heavier
//! concerns (file I/O, HTTP, history persistence) live in `mediaid-core`.

/// Errors that can occur when parsing a severity tier from text.
#[derive(Debug, thiserror::Error)]
pub enum SeverityParseError {
    /// The input did not name one of the three recognised tiers
    #[error("unrecognised severity tier: {0:?}")]
    Unrecognised(String),
}

/// Urgency tier assigned to a triage request.
///
/// Exactly three tiers exist, with the strict total order
/// `Mild < Moderate < Severe`. That ordering is the sole basis for breaking
/// ties when several dataset rows match the same input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeverityTier {
    Mild,
    Moderate,
    Severe,
}

impl SeverityTier {
    /// Numeric risk priority used to rank competing matches (Severe=3, Mild=1).
    pub fn risk_priority(self) -> u8 {
        match self {
            SeverityTier::Mild => 1,
            SeverityTier::Moderate => 2,
            SeverityTier::Severe => 3,
        }
    }

    /// Short display label for the tier.
    pub fn label(self) -> &'static str {
        match self {
            SeverityTier::Mild => "Home care",
            SeverityTier::Moderate => "See a doctor soon",
            SeverityTier::Severe => "Emergency (ER)",
        }
    }

    /// Generic advice used when no matcher supplied anything more specific.
    pub fn default_advice(self) -> &'static str {
        match self {
            SeverityTier::Mild => "Home care recommended. Rest, stay hydrated, and monitor symptoms.",
            SeverityTier::Moderate => {
                "Consult a doctor within 24 hours. If symptoms worsen, seek emergency care."
            }
            SeverityTier::Severe => {
                "Go to the ER immediately. Call emergency services (911 or your local number)."
            }
        }
    }

    /// Title-case name of the tier, as used on the wire and in stored history.
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityTier::Mild => "Mild",
            SeverityTier::Moderate => "Moderate",
            SeverityTier::Severe => "Severe",
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SeverityTier {
    type Err = SeverityParseError;

    /// Parses a tier name in any casing (`"severe"`, `"SEVERE"`, `"Severe"`).
    ///
    /// Values that do not title-case to one of the three tiers are rejected;
    /// callers decide whether that is a hard error (dataset loading) or a
    /// silent default (reasoning replies).
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "mild" => Ok(SeverityTier::Mild),
            "moderate" => Ok(SeverityTier::Moderate),
            "severe" => Ok(SeverityTier::Severe),
            _ => Err(SeverityParseError::Unrecognised(input.to_string())),
        }
    }
}

impl serde::Serialize for SeverityTier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for SeverityTier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when creating an [`Advice`] value.
#[derive(Debug, thiserror::Error)]
pub enum AdviceError {
    /// The input text was empty or contained only whitespace
    #[error("advice cannot be empty")]
    Empty,
}

/// Advice text that is guaranteed non-empty.
///
/// Every returned verdict must carry usable advice, so emptiness is ruled out
/// at construction time rather than checked at each call site. Input is
/// trimmed of leading and trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice(String);

impl Advice {
    /// Creates advice from the given input, trimming surrounding whitespace.
    ///
    /// Returns `Err(AdviceError::Empty)` if nothing remains after trimming.
    pub fn new(input: impl AsRef<str>) -> Result<Self, AdviceError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AdviceError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Advice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Advice {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for Advice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Advice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Advice::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Final outcome of one triage request.
///
/// Produced fresh per request and immutable once returned. `disease` stays
/// empty unless a matcher explicitly supplied one; `advice` can never be
/// empty by construction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TriageVerdict {
    pub severity: SeverityTier,
    pub advice: Advice,
    /// Probable condition name, or empty when no matcher named one
    #[serde(default)]
    pub disease: String,
}

impl TriageVerdict {
    /// Creates a verdict with no named disease.
    pub fn new(severity: SeverityTier, advice: Advice) -> Self {
        Self {
            severity,
            advice,
            disease: String::new(),
        }
    }

    /// Creates a verdict naming a probable condition.
    pub fn with_disease(severity: SeverityTier, advice: Advice, disease: impl Into<String>) -> Self {
        Self {
            severity,
            advice,
            disease: disease.into(),
        }
    }
}
