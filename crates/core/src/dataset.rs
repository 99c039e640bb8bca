//! Symptom dataset index — the highest-priority matching tier.
//!
//! The index is loaded once at startup from a CSV file with the fixed,
//! case-sensitive column names `symptom`, `disease` and `risk_level`
//! (column order is free, extra columns are ignored). A malformed file is a
//! load-time error; a missing file means the index is simply empty and the
//! dataset tier is skipped for every request.

use crate::{normalize, TriageError, TriageResult};
use mediaid_types::{Advice, SeverityTier, TriageVerdict};
use std::path::Path;

const SYMPTOM_COLUMN: &str = "symptom";
const DISEASE_COLUMN: &str = "disease";
const RISK_LEVEL_COLUMN: &str = "risk_level";

/// One row of the symptom dataset.
///
/// The symptom phrase is stored lowercased and trimmed so it can be compared
/// directly against normalized request text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRow {
    pub symptom: String,
    pub disease: String,
    pub risk_level: SeverityTier,
}

/// In-memory table of dataset rows, read-only after load.
#[derive(Debug, Clone, Default)]
pub struct SymptomIndex {
    rows: Vec<DatasetRow>,
}

impl SymptomIndex {
    /// An index with no rows; the dataset tier never matches.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds an index from already-parsed rows. Mainly useful in tests and
    /// for callers with a non-CSV row source.
    pub fn from_rows(rows: Vec<DatasetRow>) -> Self {
        let rows = rows
            .into_iter()
            .map(|r| DatasetRow {
                symptom: normalize(&r.symptom),
                disease: r.disease.trim().to_string(),
                risk_level: r.risk_level,
            })
            .collect();
        Self { rows }
    }

    /// Loads the index from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns `TriageError` if:
    /// - the file cannot be read,
    /// - the header row is missing or lacks a required column,
    /// - a row has a different field count than the header, or
    /// - a `risk_level` value does not name one of the three severity tiers.
    pub fn load(path: &Path) -> TriageResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(TriageError::DatasetRead)?;
        let index = Self::parse(&contents)?;
        tracing::info!(
            "loaded {} symptom rows from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    fn parse(contents: &str) -> TriageResult<Self> {
        let mut lines = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header_line) = lines.next().ok_or(TriageError::DatasetMissingHeader)?;
        let header = split_csv_line(header_line);

        let column = |name: &'static str| -> TriageResult<usize> {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(TriageError::DatasetMissingColumn(name))
        };
        let symptom_idx = column(SYMPTOM_COLUMN)?;
        let disease_idx = column(DISEASE_COLUMN)?;
        let risk_idx = column(RISK_LEVEL_COLUMN)?;

        let mut rows = Vec::new();
        for (line_idx, line) in lines {
            let fields = split_csv_line(line);
            // 1-based row numbers in errors, matching what an editor shows.
            let row = line_idx + 1;
            if fields.len() != header.len() {
                return Err(TriageError::DatasetRowWidth {
                    row,
                    found: fields.len(),
                    expected: header.len(),
                });
            }

            let risk_raw = fields[risk_idx].trim();
            let risk_level =
                risk_raw
                    .parse::<SeverityTier>()
                    .map_err(|_| TriageError::DatasetRiskLevel {
                        row,
                        value: risk_raw.to_string(),
                    })?;

            rows.push(DatasetRow {
                symptom: normalize(&fields[symptom_idx]),
                disease: fields[disease_idx].trim().to_string(),
                risk_level,
            });
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds the best dataset match for the given normalized text.
    ///
    /// Every row whose symptom phrase occurs as a substring of the text is a
    /// candidate; the candidate with the highest risk priority wins, and ties
    /// go to the first-encountered row so results are deterministic for a
    /// fixed table. Returns `None` when no row matches, which sends the
    /// engine on to the next tier.
    pub fn best_match(&self, text: &str) -> Option<TriageVerdict> {
        let mut best: Option<&DatasetRow> = None;
        for row in &self.rows {
            if row.symptom.is_empty() || !text.contains(row.symptom.as_str()) {
                continue;
            }
            match best {
                Some(current) if current.risk_level.risk_priority() >= row.risk_level.risk_priority() => {}
                _ => best = Some(row),
            }
        }

        best.map(|row| {
            let advice = Advice::new(format!(
                "Possible: {}. Please consult a doctor for proper diagnosis.",
                row.disease
            ))
            .expect("templated advice is non-empty");
            TriageVerdict::with_disease(row.risk_level, advice, row.disease.clone())
        })
    }
}

/// Splits one CSV line into fields, honouring double-quoted fields and `""`
/// escapes. Deliberately minimal: no multi-line fields, which the symptom
/// dataset format does not use.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "symptom,disease,risk_level\n\
        fever,Influenza,Moderate\n\
        chest pain,Heart Attack,Severe\n\
        runny nose,Common Cold,Mild\n";

    fn sample_index() -> SymptomIndex {
        SymptomIndex::parse(SAMPLE).unwrap()
    }

    #[test]
    fn parses_rows_and_normalizes_symptoms() {
        let index = SymptomIndex::parse(
            "symptom,disease,risk_level\n  Fever ,  Influenza , moderate\n",
        )
        .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.rows[0].symptom, "fever");
        assert_eq!(index.rows[0].disease, "Influenza");
        assert_eq!(index.rows[0].risk_level, SeverityTier::Moderate);
    }

    #[test]
    fn column_order_is_free() {
        let index = SymptomIndex::parse(
            "risk_level,disease,symptom\nSevere,Stroke,slurred speech\n",
        )
        .unwrap();
        assert_eq!(index.rows[0].symptom, "slurred speech");
        assert_eq!(index.rows[0].risk_level, SeverityTier::Severe);
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = SymptomIndex::parse("symptom,disease\nfever,Flu\n").unwrap_err();
        assert!(matches!(err, TriageError::DatasetMissingColumn("risk_level")));
    }

    #[test]
    fn empty_file_is_an_error() {
        assert!(matches!(
            SymptomIndex::parse("").unwrap_err(),
            TriageError::DatasetMissingHeader
        ));
    }

    #[test]
    fn unknown_risk_level_names_the_row() {
        let err = SymptomIndex::parse(
            "symptom,disease,risk_level\nfever,Flu,Moderate\ncough,Cold,Critical\n",
        )
        .unwrap_err();
        match err {
            TriageError::DatasetRiskLevel { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "Critical");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ragged_row_is_an_error() {
        let err =
            SymptomIndex::parse("symptom,disease,risk_level\nfever,Flu\n").unwrap_err();
        assert!(matches!(err, TriageError::DatasetRowWidth { row: 2, .. }));
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let index = SymptomIndex::parse(
            "symptom,disease,risk_level\n\"fever, chills\",Malaria,Severe\n",
        )
        .unwrap();
        assert_eq!(index.rows[0].symptom, "fever, chills");
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symptoms.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let index = SymptomIndex::load(&path).unwrap();
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn best_match_requires_substring() {
        let index = sample_index();
        assert!(index.best_match("i have a bad headache").is_none());
        let verdict = index.best_match("high fever since monday").unwrap();
        assert_eq!(verdict.disease, "Influenza");
        assert_eq!(verdict.severity, SeverityTier::Moderate);
    }

    #[test]
    fn best_match_prefers_highest_risk() {
        let index = sample_index();
        let verdict = index.best_match("fever and chest pain tonight").unwrap();
        assert_eq!(verdict.severity, SeverityTier::Severe);
        assert_eq!(verdict.disease, "Heart Attack");
    }

    #[test]
    fn equal_risk_ties_go_to_first_row() {
        let index = SymptomIndex::parse(
            "symptom,disease,risk_level\ncough,Bronchitis,Moderate\nfever,Influenza,Moderate\n",
        )
        .unwrap();
        let verdict = index.best_match("fever and cough for 3 days").unwrap();
        assert_eq!(verdict.disease, "Bronchitis");
    }

    #[test]
    fn match_advice_uses_fixed_template() {
        let verdict = sample_index().best_match("runny nose").unwrap();
        assert_eq!(
            verdict.advice.as_str(),
            "Possible: Common Cold. Please consult a doctor for proper diagnosis."
        );
    }

    #[test]
    fn empty_index_never_matches() {
        assert!(SymptomIndex::empty().best_match("fever").is_none());
        assert!(SymptomIndex::empty().is_empty());
    }
}
