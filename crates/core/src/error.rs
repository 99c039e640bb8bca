/// Errors produced by the MediAid core.
///
/// Dataset variants are load-time failures and fatal at startup: a corrupt
/// dataset could otherwise match nothing or mismatch silently. History
/// variants surface to the persistence caller. Reasoning variants never
/// escape the reasoning matcher boundary.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("failed to read dataset file: {0}")]
    DatasetRead(std::io::Error),
    #[error("dataset file is empty (missing header row)")]
    DatasetMissingHeader,
    #[error("dataset header is missing required column {0:?}")]
    DatasetMissingColumn(&'static str),
    #[error("dataset row {row} has {found} fields, header has {expected}")]
    DatasetRowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("dataset row {row} has unrecognised risk level {value:?}")]
    DatasetRiskLevel { row: usize, value: String },
    #[error("condition rule has no keywords")]
    RuleWithoutKeywords,
    #[error("failed to read history file: {0}")]
    HistoryRead(std::io::Error),
    #[error("failed to write history file: {0}")]
    HistoryWrite(std::io::Error),
    #[error("failed to serialize history: {0}")]
    HistorySerialization(serde_json::Error),
    #[error("failed to deserialize history: {0}")]
    HistoryDeserialization(serde_json::Error),
    #[error("reasoning request failed: {0}")]
    ReasoningTransport(reqwest::Error),
    #[error("reasoning service returned status {0}")]
    ReasoningStatus(u16),
    #[error("reasoning response had no message content")]
    ReasoningEmptyResponse,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
