//! The error type shared by the store, the operations, and the endpoints.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is absent or malformed. Not worth retrying.
    #[error("{0}")]
    Validation(String),

    /// Two creations raced for the same sequential identifier. Safe to retry.
    #[error("{0}")]
    IdentifierCollision(String),

    /// A unique field (email, CNIC) already belongs to another record.
    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid email or password.")]
    Unauthorized,

    /// The backing store failed. The message is logged, never sent to the client.
    #[error("store failure: {0}")]
    Store(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: &'static str,
    pub retryable: bool,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::IdentifierCollision(_) | ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-usable category reported next to the message.
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::IdentifierCollision(_) => "identifier_collision",
            ApiError::Duplicate(_) => "duplicate",
            ApiError::NotFound(_) => "not_found",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Store(_) => "internal",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::IdentifierCollision(_))
    }

    pub fn body(&self) -> ErrorBody {
        let message = match self {
            ApiError::Store(_) => "Internal Server Error.".to_string(),
            other => other.to_string(),
        };

        ErrorBody {
            message,
            status: self.category(),
            retryable: self.is_retryable(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Store(format!("{e}"))
    }
}

/// Unparseable bodies, wrong field types and a missing JSON content type are all client errors.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(e) = &self {
            tracing::error!("{e}");
        }
        (self.status_code(), Json(self.body())).into_response()
    }
}
