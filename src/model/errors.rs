//! # Model Errors
//!
//! Error types for model operations.

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Model operation errors
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    // ==================
    // Document Errors
    // ==================
    /// Document rejected by the schema
    #[error("{0}")]
    Validation(#[from] SchemaError),

    /// No document with the given id
    #[error("Document '{id}' not found in '{collection}'")]
    NotFound { collection: String, id: String },

    /// A document with the same `_id` already exists
    #[error("Duplicate _id '{id}' in '{collection}'")]
    DuplicateId { collection: String, id: String },

    /// Unique index violation
    #[error("Duplicate key {key} in index '{index}' of '{collection}'")]
    DuplicateKey {
        collection: String,
        index: String,
        key: String,
    },

    // ==================
    // Query Errors
    // ==================
    /// Malformed filter or update
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    // ==================
    // Store Errors
    // ==================
    /// A writer panicked while holding the collection lock
    #[error("Collection '{0}' is unavailable")]
    Poisoned(String),
}

impl ModelError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::Validation(err) => err.code().code(),
            ModelError::NotFound { .. } => "MODEL_NOT_FOUND",
            ModelError::DuplicateId { .. } => "MODEL_DUPLICATE_ID",
            ModelError::DuplicateKey { .. } => "MODEL_DUPLICATE_KEY",
            ModelError::InvalidFilter(_) => "MODEL_INVALID_FILTER",
            ModelError::Poisoned(_) => "MODEL_POISONED",
        }
    }

    /// True for errors caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ModelError::Poisoned(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationDetails;

    #[test]
    fn test_error_codes() {
        let err = ModelError::from(SchemaError::validation_failed(
            ValidationDetails::missing_field("name"),
        ));
        assert_eq!(err.code(), "SCHEMA_VALIDATION_FAILED");
        assert!(err.is_client_error());

        let err = ModelError::DuplicateKey {
            collection: "apps".into(),
            index: "name_1".into(),
            key: "[\"a\"]".into(),
        };
        assert_eq!(err.code(), "MODEL_DUPLICATE_KEY");
        assert!(err.to_string().contains("name_1"));

        assert!(!ModelError::Poisoned("apps".into()).is_client_error());
    }
}
