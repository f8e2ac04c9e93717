//! Error types for the invx-core library.

use thiserror::Error;

/// Main error type for the invx library.
#[derive(Error, Debug)]
pub enum InvxError {
    /// OCR acquisition error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while acquiring text from an OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine is not installed or not reachable.
    #[error("OCR backend not available: {0}")]
    BackendNotAvailable(String),

    /// The local engine ran but failed.
    #[error("OCR engine failed: {0}")]
    Engine(String),

    /// The request to a remote OCR service failed.
    #[error("OCR request failed: {0}")]
    Request(String),

    /// The remote OCR service reported errors.
    #[error("OCR service error: {}", .0.join(", "))]
    Service(Vec<String>),

    /// The input file cannot be handed to OCR.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to invoice field extraction.
///
/// Individual fields never fail; they fall back to the `"N/A"` sentinel.
/// Only the absence of usable text is reported here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// OCR produced no usable text.
    #[error("no text recognized")]
    NoText,
}

/// Result type for the invx library.
pub type Result<T> = std::result::Result<T, InvxError>;
