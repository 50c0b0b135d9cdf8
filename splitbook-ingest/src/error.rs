use std::path::PathBuf;

use crate::columns::Field;

/// Failures that abort a whole ingestion run.
///
/// Bad cell content never ends up here: amounts fall back to zero and
/// unknown party labels to `Unspecified`.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unable to open CSV file {}: {source}", .path.display())]
    StreamOpen {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("CSV file is empty or has no header row")]
    EmptyHeader,

    #[error("required column '{0}' not found in CSV")]
    MissingColumn(Field),

    #[error("reading CSV record {record}: {source}")]
    Read { record: u64, source: csv::Error },
}
