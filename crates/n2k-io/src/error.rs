//! Error types for n2k-io

use n2k_mdpa::MdpaError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model error: {0}")]
    Mdpa(#[from] MdpaError),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
