//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// A single failed constraint, tied to the form field that violated it.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Flatten `validator` derive output into one error per failed constraint.
    pub fn from_validator(errors: &validator::ValidationErrors) -> Vec<Self> {
        let mut fields = Vec::new();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                fields.push(FieldError::new(field.to_string(), message));
            }
        }
        fields
    }
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found")]
    NotFound,

    /// No active event, or the active event has no pricing configuration.
    /// An expected steady state for the public form, not a crash.
    #[error("Registration is closed")]
    RegistrationClosed,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Receipt transfer failed; no registration row is written in this case.
    #[error("Receipt upload failed: {0}")]
    Upload(String),

    /// A conditional update found the record in a different state than the
    /// caller expected (e.g. two administrators reviewing the same row).
    #[error("Conflicting update: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, fields) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", None),
            AppError::RegistrationClosed => (StatusCode::CONFLICT, "registration_closed", None),
            AppError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_failed",
                Some(fields.clone()),
            ),
            AppError::Upload(e) => {
                tracing::error!("Receipt upload failed: {}", e);
                (StatusCode::BAD_GATEWAY, "upload_failed", None)
            }
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict", None),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let message = match &self {
            // Do not leak database/internal details to callers
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: code,
            message,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
