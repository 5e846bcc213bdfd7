//! Error types

use thiserror::Error;

/// Converter error
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Queried before the reference tables were loaded
    #[error("Converter not initialized. Call initialize() first.")]
    NotInitialized,

    /// `initialize` called on a converter that already holds data
    #[error("Converter already initialized")]
    AlreadyInitialized,

    /// Reference data violates a table invariant
    #[error("Invalid address data: {0}")]
    InvalidData(String),

    /// A matched mapping row lacks a field needed to build the result
    #[error("mapping row {row} is missing field `{field}`")]
    MissingField { field: &'static str, row: usize },

    /// Dataset file could not be read
    #[cfg(feature = "json")]
    #[error("Cannot read address data: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset file is not valid JSON or has an unexpected shape
    #[cfg(feature = "json")]
    #[error("Invalid JSON in address data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
