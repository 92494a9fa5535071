//! Loader error types

use checker_core::{Source, SourceError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("load task failed: {0}")]
    Task(String),
}

impl LoaderError {
    /// Collapse into the value-level error surfaced to the engine
    pub fn into_source_error(self, origin: Source) -> SourceError {
        SourceError::unavailable(origin, self.to_string())
    }
}
