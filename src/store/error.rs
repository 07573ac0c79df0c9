//! Workflow store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store folder has not been created yet.
    #[error("BusLog is not initialized. Run 'buslog init' first")]
    NotInitialized,

    /// Re-initialization attempted without force.
    #[error("BusLog is already initialized")]
    AlreadyInitialized,

    /// A document with the same identifier exists.
    #[error("Workflow '{0}' already exists")]
    DocumentAlreadyExists(String),

    /// No document with this identifier.
    #[error("Workflow '{0}' not found")]
    DocumentNotFound(String),

    /// The name does not produce a usable identifier.
    #[error("Invalid workflow name: {0:?}")]
    InvalidName(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unserializable JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
