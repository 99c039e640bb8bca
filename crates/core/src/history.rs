//! Append-only triage history persisted as a JSON list.
//!
//! Every triage request/response pair is appended after the verdict is
//! computed; entries are never modified or deleted here (retention is a
//! collaborator concern). The file format is a single JSON array, oldest
//! entry first, rewritten in full on each append. A mutex serialises the
//! read-append-write cycle so concurrent appenders cannot lose entries.

use crate::{TriageError, TriageResult};
use chrono::{DateTime, Utc};
use mediaid_types::{Advice, SeverityTier, TriageVerdict};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One recorded triage request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    /// Original raw input text, before normalization
    pub symptoms: String,
    pub severity: SeverityTier,
    pub advice: Advice,
    #[serde(default)]
    pub disease: String,
    /// UTC arrival time of the request
    pub recorded_at: DateTime<Utc>,
}

/// File-backed append-only history store.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    // Guards the read-append-write cycle, not individual file operations.
    write_lock: Mutex<()>,
}

impl HistoryStore {
    /// Creates a store backed by the given file.
    ///
    /// The file does not need to exist yet; a missing file reads as an empty
    /// history and is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry for the given verdict and returns it.
    ///
    /// # Errors
    ///
    /// Returns `TriageError` if the existing history cannot be read or
    /// parsed, or the updated file cannot be written.
    pub fn append(&self, symptoms: &str, verdict: &TriageVerdict) -> TriageResult<HistoryEntry> {
        let entry = HistoryEntry {
            symptoms: symptoms.to_string(),
            severity: verdict.severity,
            advice: verdict.advice.clone(),
            disease: verdict.disease.clone(),
            recorded_at: Utc::now(),
        };

        let _guard = self.write_lock.lock().expect("history lock poisoned");
        let mut entries = self.read_entries()?;
        entries.push(entry.clone());

        let json =
            serde_json::to_string_pretty(&entries).map_err(TriageError::HistorySerialization)?;
        std::fs::write(&self.path, json).map_err(TriageError::HistoryWrite)?;

        Ok(entry)
    }

    /// Returns all entries, oldest first.
    ///
    /// Consumers wanting reverse-chronological order reverse the list
    /// themselves.
    pub fn all(&self) -> TriageResult<Vec<HistoryEntry>> {
        self.read_entries()
    }

    fn read_entries(&self) -> TriageResult<Vec<HistoryEntry>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TriageError::HistoryRead(e)),
        };

        serde_json::from_str(&contents).map_err(TriageError::HistoryDeserialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(severity: SeverityTier, advice: &str, disease: &str) -> TriageVerdict {
        TriageVerdict::with_disease(severity, Advice::new(advice).unwrap(), disease)
    }

    fn temp_store(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::new(dir.path().join("history.json"))
    }

    #[test]
    fn missing_file_reads_as_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn append_preserves_arrival_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        for i in 0..5 {
            let text = format!("symptom {i}");
            store
                .append(&text, &verdict(SeverityTier::Mild, "rest", ""))
                .unwrap();
        }

        let entries = store.all().unwrap();
        assert_eq!(entries.len(), 5);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.symptoms, format!("symptom {i}"));
        }
    }

    #[test]
    fn append_records_the_original_raw_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        store
            .append("  FEVER and Chills  ", &verdict(SeverityTier::Moderate, "see gp", "Flu"))
            .unwrap();

        let entries = store.all().unwrap();
        assert_eq!(entries[0].symptoms, "  FEVER and Chills  ");
        assert_eq!(entries[0].severity, SeverityTier::Moderate);
        assert_eq!(entries[0].disease, "Flu");
    }

    #[test]
    fn entries_survive_a_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let store = HistoryStore::new(&path);
        store
            .append("cough", &verdict(SeverityTier::Mild, "rest", ""))
            .unwrap();
        drop(store);

        let reopened = HistoryStore::new(&path);
        let entries = reopened.all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].symptoms, "cough");
    }

    #[test]
    fn corrupt_file_is_reported_not_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "not json").unwrap();

        let store = HistoryStore::new(&path);
        assert!(matches!(
            store.all(),
            Err(TriageError::HistoryDeserialization(_))
        ));
    }

    #[test]
    fn concurrent_appends_do_not_lose_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(temp_store(&dir));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let text = format!("writer {i}");
                    store
                        .append(&text, &verdict(SeverityTier::Mild, "rest", ""))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.all().unwrap().len(), 8);
    }
}
