//! Unified error handling for the admin API.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use shopdesk_core::UserId;

use crate::db::RepositoryError;
use crate::forms::ValidationError;
use crate::guard::GuardError;

/// Application-level error type returned by every handler.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Resource not found, or owned by another store.
    #[error("Not found")]
    NotFound,

    /// Caller identity is missing or invalid.
    #[error("Unauthorized")]
    Unauthorized,

    /// Caller does not own the store.
    #[error("Forbidden")]
    Forbidden,

    /// The resource is still referenced by other resources.
    #[error("Conflict")]
    Conflict,

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short tag identifying the error kind in error reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn report(&self) {
        if self.status().is_server_error() {
            let event_id = sentry::with_scope(
                |scope| scope.set_tag("error.kind", self.kind()),
                || sentry::capture_error(self),
            );
            tracing::error!(
                error = %self,
                kind = self.kind(),
                sentry_event_id = %event_id,
                "Admin request error"
            );
        } else {
            tracing::warn!(error = %self, kind = self.kind(), "Admin request rejected");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal error".to_string(),
            _ => self.to_string(),
        };

        (self.status(), message).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(_) => Self::Conflict,
            RepositoryError::InvalidReference(_) => Self::BadRequest(err.to_string()),
            RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                Self::Database(err)
            }
        }
    }
}

impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Unauthenticated => Self::Unauthorized,
            GuardError::Forbidden => Self::Forbidden,
            GuardError::Repository(e) => Self::from(e),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Set the Sentry user context for the current request.
pub fn set_sentry_user(user: &UserId) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user.to_string()),
            ..Default::default()
        }));
    });
}
