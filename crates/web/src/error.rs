//! Unified error handling.
//!
//! Provides a single `AppError` type that logs server-side faults (and
//! forwards them to Sentry when configured) before responding to the
//! client. Route handlers return `Result<T, AppError>` and propagate
//! with `?`; detail is never leaked to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(RepositoryError),

    /// Session load/store failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// Authentication machinery failed. Bad credentials never take
    /// this path; they are recovered at the form.
    #[error("auth error: {0}")]
    Auth(AuthError),

    /// Resource not found.
    #[error("not found")]
    NotFound,

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or mismatched CSRF token.
    #[error("invalid CSRF token")]
    CsrfRejected,
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Repository(RepositoryError::NotFound) => Self::NotFound,
            other => Self::Auth(other),
        }
    }
}

impl AppError {
    /// Server faults get operator-side diagnostics; client errors only
    /// hit the access log.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Session(_) | Self::Template(_) | Self::Auth(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "request failed"
            );
        }

        let (status, message) = match &self {
            Self::Database(_) | Self::Session(_) | Self::Template(_) | Self::Auth(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            Self::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            Self::CsrfRejected => (StatusCode::FORBIDDEN, "Invalid CSRF token"),
        };

        (status, message.to_owned()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
