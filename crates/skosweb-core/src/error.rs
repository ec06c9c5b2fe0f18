//! Error types for skosweb.

use thiserror::Error;

/// Result type alias using skosweb's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for skosweb operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found (scheme, concept, collection or URI)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input (unknown collection in a query, missing parameter)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A vocabulary dataset could not be loaded or registered
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
