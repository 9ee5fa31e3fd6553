use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};
use validator::ValidationErrors;

use crate::store::StoreError;

/// Failures surfaced by the talent services and mapped onto HTTP statuses.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("email `{0}` is already registered")]
    EmailTaken(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("authentication required")]
    Unauthenticated,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("{0}")]
    Validation(String),
    #[error("invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),
    #[error("at least one of title, location or company is required")]
    FilterRequired,
    #[error("password hashing failed: {0}")]
    Password(String),
    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        debug!(?errors, "input validation failed");
        ServiceError::Validation(
            format!("input validation error: [{errors}]").replace('\n', ", "),
        )
    }
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Forbidden(_) | ServiceError::InvalidToken => StatusCode::FORBIDDEN,
            ServiceError::EmailTaken(_) | ServiceError::Validation(_) | ServiceError::Body(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::InvalidCredentials | ServiceError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::FilterRequired => StatusCode::METHOD_NOT_ALLOWED,
            ServiceError::Password(_)
            | ServiceError::Token(_)
            | ServiceError::Store(_)
            | ServiceError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
