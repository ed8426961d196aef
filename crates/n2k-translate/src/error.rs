//! Error types for translation.

use n2k_bulk::BulkError;
use n2k_io::IoError;
use thiserror::Error;

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;

#[derive(Error, Debug)]
pub enum TranslationError {
    /// A record names a property, material, node or sub-model that does not exist.
    #[error("{record}: {field} {key} has no matching {target}")]
    MissingReference {
        record: String,
        field: &'static str,
        key: String,
        target: &'static str,
    },

    /// A record is well formed but describes something that cannot be translated.
    #[error("{record}: {message}")]
    Domain { record: String, message: String },

    #[error(transparent)]
    Bulk(#[from] BulkError),

    #[error(transparent)]
    Io(#[from] IoError),
}

impl TranslationError {
    pub(crate) fn missing(
        record: impl Into<String>,
        field: &'static str,
        key: impl ToString,
        target: &'static str,
    ) -> Self {
        Self::MissingReference {
            record: record.into(),
            field,
            key: key.to_string(),
            target,
        }
    }

    pub(crate) fn domain(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Domain {
            record: record.into(),
            message: message.into(),
        }
    }
}
