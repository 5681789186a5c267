//! Error types for Chemventory core operations.
//!
//! Backends and the key-value stores report failures through
//! `ChemventoryError`. The sync façade catches them, logs them and falls
//! back to the local cache, so callers of `ChemicalStore` never see them.

use thiserror::Error;

/// Result type alias for Chemventory operations.
pub type Result<T> = std::result::Result<T, ChemventoryError>;

/// Core error type for Chemventory operations.
#[derive(Debug, Error)]
pub enum ChemventoryError {
    /// Hosted backend unreachable or rejected the request
    #[error("Remote error: {0}")]
    Remote(String),

    /// Local cache or key-value slot error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Data validation or (de)serialization error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration missing or malformed
    #[error("Config error: {0}")]
    Config(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for ChemventoryError {
    fn from(err: std::io::Error) -> Self {
        ChemventoryError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ChemventoryError {
    fn from(err: serde_json::Error) -> Self {
        ChemventoryError::Validation(err.to_string())
    }
}

impl From<reqwest::Error> for ChemventoryError {
    fn from(err: reqwest::Error) -> Self {
        ChemventoryError::Remote(err.to_string())
    }
}
