use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("manifest error: {0}")]
    Manifest(String),
}

/// Failures reported by a grid source.
///
/// Running out of pages is not a failure; see `PageGrids::EndOfDocument`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("page {page} could not be extracted: {message}")]
    Page { page: u32, message: String },

    #[error("document could not be opened: {message}")]
    Document { message: String },
}
