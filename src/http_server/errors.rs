//! # HTTP Errors
//!
//! Every failure is returned as JSON `{ "code", "message" }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::app::AppError;
use crate::model::ModelError;

/// Result type for route handlers
pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Clone, Error)]
pub enum HttpError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("{message}")]
    Unauthorized { code: &'static str, message: String },

    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("{message}")]
    Internal { code: &'static str, message: String },
}

impl HttpError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        HttpError::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        HttpError::Unauthorized {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        HttpError::NotFound {
            code,
            message: message.into(),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            HttpError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            HttpError::NotFound { .. } => StatusCode::NOT_FOUND,
            HttpError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            HttpError::BadRequest { code, .. }
            | HttpError::Unauthorized { code, .. }
            | HttpError::NotFound { code, .. }
            | HttpError::Internal { code, .. } => *code,
        }
    }
}

impl From<ModelError> for HttpError {
    fn from(err: ModelError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            ModelError::NotFound { .. } => HttpError::NotFound { code, message },
            ModelError::Poisoned(_) => HttpError::Internal { code, message },
            _ => HttpError::BadRequest { code, message },
        }
    }
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            AppError::MissingParams(_) => HttpError::BadRequest { code, message },
            AppError::NotFound(_) => HttpError::NotFound { code, message },
            AppError::Unauthorized(_) => HttpError::Unauthorized { code, message },
            AppError::Model(inner) => HttpError::from(inner),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_mapping() {
        let err = HttpError::from(AppError::MissingParams("appId".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "MISSING_PARAMS");

        let err = HttpError::from(AppError::Unauthorized("other team".into()));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = HttpError::from(AppError::NotFound("a1".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_model_error_mapping() {
        let err = HttpError::from(ModelError::Poisoned("apps".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = HttpError::from(ModelError::InvalidFilter("bad".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "MODEL_INVALID_FILTER");
    }
}
