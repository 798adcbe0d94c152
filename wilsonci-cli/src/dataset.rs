//! Loading the anonymized response CSV into a `SurveyResponseSet`.
//!
//! One row per respondent, one column per question; the header row holds the
//! question ids. Every cell is interpreted through the question schema.
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use wilsonci_core::{QuestionSchema, ResponseRecord, SurveyResponseSet};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("duplicate column '{0}' in header")]
    DuplicateColumn(String),
    #[error("empty column name at position {0} in header")]
    EmptyColumn(usize),
}

/// Read responses from any CSV source.
pub fn read_responses<R: Read>(reader: R, schema: &QuestionSchema) -> Result<SurveyResponseSet, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let question_ids: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut seen = HashSet::with_capacity(question_ids.len());
    for (i, q) in question_ids.iter().enumerate() {
        if q.is_empty() {
            return Err(DatasetError::EmptyColumn(i + 1));
        }
        if !seen.insert(q.as_str()) {
            return Err(DatasetError::DuplicateColumn(q.clone()));
        }
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let record: ResponseRecord = question_ids
            .iter()
            .zip(row.iter())
            .map(|(q, raw)| (q.clone(), schema.kind_of(q).interpret(raw)))
            .collect();
        records.push(record);
    }

    debug!(questions = question_ids.len(), respondents = records.len(), "loaded responses");
    Ok(SurveyResponseSet::new(question_ids, records))
}

/// Read responses from a CSV file on disk.
pub fn load_responses(path: &Path, schema: &QuestionSchema) -> Result<SurveyResponseSet, DatasetError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_responses(file, schema)
}
