//! Error mapping for the JSON API.
//!
//! Every error renders as `{ "error", "code" }`. A rejected proof submission
//! also carries `messages`, one entry per failed check in form order, so API
//! clients see the same list the HTML form shows.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use proofsheet_core::error::CoreError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A proof submission failed one or more checks.
    #[error("Invalid proof: {}", .0.join(" "))]
    InvalidProof(Vec<String>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The proof's image folder could not be prepared.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    messages: Vec<String>,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            messages: Vec::new(),
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", "An internal error occurred")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidProof(messages) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: messages.join(" "),
                    code: "VALIDATION_ERROR",
                    messages,
                },
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("VALIDATION_ERROR", msg))
            }
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", format!("{entity} {id} not found")),
            ),
            AppError::Database(sqlx::Error::RowNotFound) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", "Record not found"),
            ),
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
        };

        (status, Json(body)).into_response()
    }
}
