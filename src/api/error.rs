//! Error types for the library API.

use crate::core::form::ValidationError;
use thiserror::Error;

/// Errors related to the prompt store (storage backend, HTTP, lookups).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested entity does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// A category deletion named an unusable target category.
    #[error("Invalid target category: {0}")]
    InvalidTarget(String),

    /// A submitted payload failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The storage backend could not complete the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// An underlying file I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or deserialize data.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP request to a remote API failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A remote API answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl StoreError {
    pub fn category_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: "Category",
            id: id.into(),
        }
    }

    pub fn prompt_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: "Prompt",
            id: id.into(),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(e: ValidationError) -> Self {
        StoreError::Validation(e.to_string())
    }
}
