//! Error handling for the contract differ application

use thiserror::Error;

/// Which side of a comparison a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Original,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Original => write!(f, "original"),
            Side::Target => write!(f, "target"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ContractDifferError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Extraction failed for {side} document: {message}")]
    ExtractionFailed { side: Side, message: String },

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("History storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("Comparison timed out after {0} seconds")]
    Timeout(u64),
}

pub type Result<T> = std::result::Result<T, ContractDifferError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ContractDifferError {
    fn from(err: anyhow::Error) -> Self {
        ContractDifferError::Extraction(err.to_string())
    }
}
