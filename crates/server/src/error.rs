//! Unified error handling for the API.
//!
//! Every error becomes a JSON envelope `{"success": false, "message": ...}`.
//! Server-side failures are logged and sent to Sentry; clients only see
//! "Server error".

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::LeadValidationError;
use crate::services::{AuthError, LeadError};

/// Message returned to clients for any unexpected failure.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Application-level error type.
///
/// Client-facing variants display as the bare message that goes into the
/// response envelope.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid token.
    #[error("{0}")]
    Unauthorized(String),

    /// Caller may not perform this action.
    #[error("{0}")]
    Forbidden(String),

    /// Bad request from client (validation failures included).
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => SERVER_ERROR_MESSAGE.to_owned(),
            _ => self.to_string(),
        };

        (
            self.status(),
            Json(ErrorBody {
                success: false,
                message: &message,
            }),
        )
            .into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials
            | AuthError::InvalidCredentials
            | AuthError::InvalidEmail
            | AuthError::AdminAlreadyExists => Self::BadRequest(err.to_string()),
            AuthError::RegistrationDisabled => Self::Forbidden(err.to_string()),
            AuthError::InvalidToken(_) => Self::Unauthorized(err.to_string()),
            AuthError::Repository(e) => Self::Database(e),
            AuthError::TokenSigning(_)
            | AuthError::TokenExpiryOutOfRange
            | AuthError::PasswordHash => Self::Internal(err.to_string()),
        }
    }
}

impl From<LeadValidationError> for AppError {
    fn from(err: LeadValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<LeadError> for AppError {
    fn from(err: LeadError) -> Self {
        match err {
            LeadError::Validation(e) => e.into(),
            LeadError::NotFound => Self::NotFound(err.to_string()),
            LeadError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Set the Sentry user context from an admin ID.
pub fn set_sentry_user(admin_id: i32, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}
