//! Error types for bulk data parsing.

use thiserror::Error;

/// Errors raised while reading bulk data cards.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BulkError {
    /// A field is missing where one is required, or cannot be read as its declared kind.
    #[error("line {line}: {record} field {index} ({field}): {message}")]
    Format {
        record: String,
        line: usize,
        index: usize,
        field: &'static str,
        message: String,
    },

    /// The card identifier names an entry kind this crate does not read.
    #[error("line {line}: {identifier} is not a supported entry type")]
    UnsupportedEntry { identifier: String, line: usize },
}

/// Result type for bulk data operations
pub type Result<T> = std::result::Result<T, BulkError>;
