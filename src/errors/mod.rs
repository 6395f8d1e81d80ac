//! Error types for the employee core and the mock API.
//!
//! The core returns every failure as a value. The mock API maps its failures onto
//! HTTP statuses with a `{"detail": ...}` body, the shape the HTTP repository reads back.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure returned to the presentation layer from a submit or quick-add.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Local input problem, raised before any repository call.
    #[error("{0}")]
    Validation(String),
    /// The repository rejected or could not complete the call.
    #[error("{0}")]
    Repository(String),
    /// The action has no valid target record.
    #[error("{0}")]
    Selection(String),
}

impl SubmissionError {
    /// User-facing message for a notification.
    pub fn message(&self) -> &str {
        match self {
            SubmissionError::Validation(msg)
            | SubmissionError::Repository(msg)
            | SubmissionError::Selection(msg) => msg,
        }
    }
}

/// Repository operations, used to pick the generic fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOperation {
    List,
    Create,
    Update,
}

impl RepositoryOperation {
    pub fn fallback_message(&self) -> &'static str {
        match self {
            RepositoryOperation::List => "Failed to load employees",
            RepositoryOperation::Create => "Failed to create employee",
            RepositoryOperation::Update => "Failed to update employee",
        }
    }
}

/// Failure reported by an [`EmployeeRepository`](crate::repository::EmployeeRepository).
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Non-2xx response, with the server's `detail` text when it sent one.
    #[error("request rejected with status {status}")]
    Rejected { status: u16, detail: Option<String> },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not a record or a listing.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl RepositoryError {
    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        RepositoryError::Rejected {
            status,
            detail: Some(detail.into()),
        }
    }

    /// Server-provided detail, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RepositoryError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message to show for a failed `operation`: the server detail, else a generic text.
    pub fn user_message(&self, operation: RepositoryOperation) -> String {
        self.detail()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| operation.fallback_message())
            .to_string()
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Decode(err.to_string())
    }
}

/// Mock API error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),
    /// Validation error
    #[error("validation error: {0}")]
    Validation(String),
    /// Uniqueness conflict
    #[error("conflict: {0}")]
    Conflict(String),
    /// Bad request
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Rejected { status, detail } => {
                let msg = detail.unwrap_or_else(|| "Request rejected".to_string());
                match status {
                    404 => AppError::NotFound(msg),
                    409 => AppError::Conflict(msg),
                    422 => AppError::Validation(msg),
                    400 => AppError::BadRequest(msg),
                    _ => AppError::Internal(msg),
                }
            }
            RepositoryError::Decode(msg) => AppError::BadRequest(msg),
            RepositoryError::Transport(e) => {
                tracing::error!("Upstream error: {:?}", e);
                AppError::Internal(format!("Upstream error: {}", e))
            }
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = RepositoryError::rejected(409, "Employee number 1001 already exists");
        assert_eq!(
            err.user_message(RepositoryOperation::Create),
            "Employee number 1001 already exists"
        );
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = RepositoryError::Rejected {
            status: 500,
            detail: None,
        };
        assert_eq!(
            err.user_message(RepositoryOperation::Update),
            "Failed to update employee"
        );

        let blank = RepositoryError::rejected(500, "  ");
        assert_eq!(
            blank.user_message(RepositoryOperation::List),
            "Failed to load employees"
        );
    }

    #[test]
    fn test_app_error_from_rejection() {
        let err: AppError = RepositoryError::rejected(409, "taken").into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "taken");

        let err: AppError = RepositoryError::rejected(404, "gone").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "not found: gone");
    }
}
