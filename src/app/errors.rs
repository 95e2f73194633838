//! # App Errors

use thiserror::Error;

use crate::model::ModelError;

/// Result type for app operations
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Missing required parameter
    #[error("Missing required parameter: {0}")]
    MissingParams(String),

    /// App not found
    #[error("App not found: {0}")]
    NotFound(String),

    /// Caller may not access the app
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Underlying model failure
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl AppError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingParams(_) => "MISSING_PARAMS",
            AppError::NotFound(_) => "APP_NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Model(err) => err.code(),
        }
    }
}
