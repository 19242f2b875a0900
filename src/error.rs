//! Application error type shared by every layer.
//!
//! Services return [`AppError`] directly. Storage failures are carried through
//! untouched in [`AppError::Storage`]; only the HTTP mapping in
//! [`IntoResponse`] looks inside them.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::selector::SelectionError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input, such as a filter count that does not match the day count.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Cellar, calendar, day or filter does not exist.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// A filter matched no entries.
    #[error("{message}")]
    NoCandidates { message: String, details: Value },

    /// Every entry a filter matched is already assigned elsewhere in the calendar.
    #[error("{message}")]
    NoUniqueCandidate { message: String, details: Value },

    /// Failure reported by the database.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
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

    /// Converts a selection failure, attaching context about the day or filter.
    pub fn from_selection(err: SelectionError, details: Value) -> Self {
        match err {
            SelectionError::NoCandidates => Self::NoCandidates {
                message: "No candidates found for filter".to_string(),
                details,
            },
            SelectionError::NoUniqueCandidate => Self::NoUniqueCandidate {
                message: "No unique candidate found for filter".to_string(),
                details,
            },
        }
    }

    /// Returns true for a unique-constraint violation reported by the database.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Storage(e) => e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation()),
            _ => false,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::NoCandidates { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "no_candidates"),
            AppError::NoUniqueCandidate { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "no_unique_candidate")
            }
            AppError::Storage(_) if self.is_unique_violation() => (StatusCode::CONFLICT, "conflict"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        }
    }

    /// Builds the client-facing error description.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();

        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::NoCandidates { message, details }
            | AppError::NoUniqueCandidate { message, details } => {
                (message.clone(), details.clone())
            }
            AppError::Storage(e) => match e.as_database_error() {
                Some(db) if db.is_unique_violation() => (
                    "Unique constraint violation".to_string(),
                    json!({ "constraint": db.constraint() }),
                ),
                _ => ("Database error".to_string(), json!({})),
            },
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
        AppError::bad_request("Request validation failed", details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();

        if let AppError::Storage(ref e) = self {
            tracing::error!(error = %e, "Storage error");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::bad_request("bad", json!({})),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::not_found("gone", json!({})), StatusCode::NOT_FOUND),
            (
                AppError::from_selection(SelectionError::NoCandidates, json!({})),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::from_selection(SelectionError::NoUniqueCandidate, json!({})),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Storage(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_selection_errors_keep_details() {
        let err = AppError::from_selection(
            SelectionError::NoUniqueCandidate,
            json!({ "day": "2023-12-01T00:00:00+00:00" }),
        );

        let info = err.to_error_info();
        assert_eq!(info.code, "no_unique_candidate");
        assert_eq!(info.details["day"], "2023-12-01T00:00:00+00:00");
    }

    #[test]
    fn test_storage_error_hides_internals() {
        let info = AppError::Storage(sqlx::Error::PoolTimedOut).to_error_info();
        assert_eq!(info.code, "storage_error");
        assert_eq!(info.message, "Database error");
        assert!(!AppError::Storage(sqlx::Error::PoolTimedOut).is_unique_violation());
    }
}
