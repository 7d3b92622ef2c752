//! Unified error handling for the API.
//!
//! Every error leaving a handler serializes as
//! `{ "error": "<machine_kind>", "message": "<human text>" }` so the
//! frontend can branch on the kind without parsing prose. Resolver and
//! mutator failures are deterministic logic errors and are never retried.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::HierarchyError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// The acting user cannot own a reporting scope (missing or wrong role).
    #[error("Invalid reporting root: {0}")]
    InvalidRoot(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reassignment target exists but cannot receive the assignment.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Uniqueness conflict (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable error kind for the response body.
    const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRoot(_) => "invalid_root",
            Self::NotFound(_) => "not_found",
            Self::InvalidTarget(_) => "invalid_target",
            Self::Conflict(_) => "conflict",
            Self::BadRequest(_) => "bad_request",
            Self::Database(_) | Self::Internal(_) => "internal",
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("no such record".to_owned()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::InvalidTarget(msg) => Self::InvalidTarget(msg),
            err @ (RepositoryError::Database(_) | RepositoryError::DataCorruption(_)) => {
                Self::Database(err)
            }
        }
    }
}

impl From<HierarchyError> for AppError {
    fn from(err: HierarchyError) -> Self {
        match err {
            HierarchyError::RootNotFound(_) | HierarchyError::NotAReportingRoot(_, _) => {
                Self::InvalidRoot(err.to_string())
            }
            HierarchyError::Repository(e) => e.into(),
        }
    }
}

/// JSON error envelope returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidRoot(_) | Self::InvalidTarget(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        let body = ErrorBody {
            error: self.kind(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
