// API error type and its HTTP mapping
// Decision: Every error body is {code, message}
// Decision: 5xx bodies are generic; details only go to the log
// Decision: Extractor rejections (query, path, JSON body) answer 400 with the same body

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sourcecoop_core::AuthError;
use thiserror::Error;

use super::common::ErrorResponse;

pub const NO_SESSION_MESSAGE: &str = "No Session Found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Errors returned by route handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Session required but absent
    #[error("No Session Found")]
    Unauthenticated,

    /// Session present, action denied
    #[error("Forbidden")]
    Forbidden,

    /// Resource missing or hidden from the caller
    #[error("{0}")]
    NotFound(String),

    /// Malformed input
    #[error("{0}")]
    BadRequest(String),

    /// Failure below the HTTP layer
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::Auth(AuthError::Unauthenticated) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden | ApiError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) | ApiError::Auth(AuthError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Unauthenticated | ApiError::Auth(AuthError::Unauthenticated) => {
                NO_SESSION_MESSAGE.to_string()
            }
            _ if status.is_server_error() => {
                tracing::error!(error = %self, "Request failed");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse::new(status.as_u16(), message))).into_response()
    }
}
