//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates write-outcome faults, validation
//! errors and backend (transport) errors.
//!
//! A missing record is not an error: read paths return `Ok(None)` or an empty
//! list instead.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store accepted the call but reported no effect.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns true for faults raised by the store transport itself
    /// (connection loss, unavailable backend, driver failures).
    pub fn is_backend(&self) -> bool {
        matches!(self, StorageError::Backend(_))
    }
}

/// Faults derived from the counts a store reports for a write.
#[derive(Error, Debug)]
pub enum WriteError {
    /// The store reported zero inserted documents (e.g. duplicate key).
    #[error("insert failed: {entity}/{id}")]
    InsertFailed { entity: String, id: String },

    /// The store reported zero modified documents.
    #[error("update failed: {entity}/{id}")]
    UpdateFailed { entity: String, id: String },
}

/// Errors related to record validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Missing required field.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },

    /// A field carries a value the layer cannot interpret.
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}
