//! Error types for loading the medal table and exporting reports.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure while loading the medal-tally file. No partial table is
/// ever produced.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read data file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data file {} is missing required columns: {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error(
        "Medal count out of range at row {row} in {}: the {column} column no longer fits in 64 bits",
        .path.display()
    )]
    OutOfRange {
        path: PathBuf,
        row: u64,
        column: &'static str,
    },

    #[error("Malformed record at row {row} in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        row: u64,
        #[source]
        source: csv::Error,
    },
}

/// Failure while writing a rendered report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
