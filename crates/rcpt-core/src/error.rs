//! Error types for the rcpt-core library.
//!
//! Parsing itself never fails; these cover the collaborator boundaries
//! (OCR responses, sheet output) and file I/O.

use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// OCR response decoding error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Sheet output error.
    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by the OCR collaborator's annotate response.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The service answered with an error object.
    #[error("annotate request failed: {0}")]
    Api(String),

    /// No text annotations in the response.
    #[error("no text detected in the image")]
    NoText,
}

/// Errors related to writing sheet rows.
#[derive(Error, Debug)]
pub enum SheetError {
    /// Writing the CSV sheet failed.
    #[error("failed to write CSV sheet: {0}")]
    Csv(#[from] csv::Error),

    /// Sheet name cannot be used in an A1 range.
    #[error("invalid sheet name: {0:?}")]
    InvalidRange(String),
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;
