//! Error types for the hoadon-core library.

use thiserror::Error;

/// Main error type for the hoadon library.
#[derive(Error, Debug)]
pub enum HoadonError {
    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Bill splitting error.
    #[error("split error: {0}")]
    Split(#[from] SplitError),

    /// JSON (de)serialization error outside of input classification.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to invoice field extraction.
///
/// Only the structured extractors and the manual invoice builder produce
/// these; heuristic misfires are never reported as errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A required array in a retailer payload is empty.
    #[error("{0} is empty")]
    EmptyCollection(&'static str),

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },

    /// An amount does not fit into whole đồng.
    #[error("amount out of range: {0}")]
    Overflow(String),

    /// No invoice data could be extracted.
    #[error("no invoice data found")]
    NoData,
}

/// Errors related to splitting amounts between people.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SplitError {
    /// Division by zero people or zero invoices.
    #[error("cannot split between zero {0}")]
    ZeroParts(&'static str),
}

/// Result type for the hoadon library.
pub type Result<T> = std::result::Result<T, HoadonError>;
