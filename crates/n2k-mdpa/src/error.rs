//! Error types for reading model text.

use thiserror::Error;

/// Errors raised while reading `.mdpa` text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MdpaError {
    #[error("line {line}: block `{section}` is never closed")]
    UnterminatedBlock { section: String, line: usize },

    #[error("line {line}: expected `End {expected}`, found `{found}`")]
    MismatchedEnd {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("line {line}: {message}")]
    Format { line: usize, message: String },
}

/// Result type for model text operations
pub type Result<T> = std::result::Result<T, MdpaError>;
