//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

use auth::AuthError;
use media::UploadError;

use crate::catalog::CatalogError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid session, or rejected credentials
    #[error("{0}")]
    Unauthorized(String),

    /// One message per invalid field
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unknown resource
    #[error("{0}")]
    NotFound(String),

    /// Conflicts with existing state
    #[error("{0}")]
    Conflict(String),

    /// Upload over the size ceiling
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl ApiError {
    /// Uniform rejection for a missing, expired or forged session
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Validation(messages) => Value::from(messages),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg) => Value::from(msg),
            ApiError::InternalServerError => Value::from("Internal server error"),
        };

        let body = Json(json!({
            "statusCode": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CatalogError::Repository(e) => {
                error!("Catalog storage failure: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(messages) => ApiError::Validation(messages),
            AuthError::EmailTaken => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidToken => ApiError::unauthorized(),
            other => {
                error!("Authentication failure: {}", other);
                ApiError::InternalServerError
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedType(_) => ApiError::BadRequest(err.to_string()),
            UploadError::TooLarge { .. } => ApiError::PayloadTooLarge(err.to_string()),
            UploadError::Io(e) => {
                error!("Poster storage failure: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
