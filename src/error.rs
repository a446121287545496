//! Application error type and its HTTP mapping.
//!
//! Every fallible operation in the service layer returns [`AppError`]. The
//! HTTP layer renders it as:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short link not found", "details": {} } }
//! ```

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed input. No side effects were performed.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Unknown short code. No side effects were performed.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// A uniqueness rule was violated.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// No free short code was found within the attempt budget.
    #[error("{message}")]
    GenerationExhausted { message: String, details: Value },

    /// Storage or transaction failure. Nothing from the failed operation was committed.
    #[error("{message}")]
    Persistence { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn generation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::GenerationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn persistence(message: impl Into<String>, details: Value) -> Self {
        Self::Persistence {
            message: message.into(),
            details,
        }
    }

    /// HTTP status and stable error code for this variant.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Self::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            Self::GenerationExhausted { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "code_generation_exhausted",
            ),
            Self::Persistence { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "persistence_failure"),
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let (message, details) = match self {
            Self::Validation { message, details }
            | Self::NotFound { message, details }
            | Self::Conflict { message, details }
            | Self::GenerationExhausted { message, details }
            | Self::Persistence { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::persistence("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Malformed request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(
            "Malformed query string",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
