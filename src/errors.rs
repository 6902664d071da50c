use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Credential-store and auth-flow failures. None of these are fatal; every
/// variant maps to a JSON error body and an interactive status code.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("An account with this email already exists")]
    DuplicateUser,
    #[error("No account found with this email address")]
    UserNotFound,
    #[error("Invalid credentials")]
    InvalidCredential,
    #[error("{0}")]
    Validation(String),
    #[error("Invalid or expired token")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::DuplicateUser => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredential | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Internal(e) => {
                error!(error = %e, "internal auth error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Resume-record failures.
#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("{0}")]
    Validation(String),
    #[error("Entry not found")]
    EntryNotFound,
    #[error("Invalid file format: {0}")]
    ImportFormat(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ResumeError {
    fn into_response(self) -> Response {
        let status = match &self {
            ResumeError::Validation(_) => StatusCode::BAD_REQUEST,
            ResumeError::EntryNotFound => StatusCode::NOT_FOUND,
            ResumeError::ImportFormat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ResumeError::Internal(e) => {
                error!(error = %e, "internal resume error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
