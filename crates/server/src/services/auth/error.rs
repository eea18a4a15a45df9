//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password missing from the request.
    #[error("Please provide username and password")]
    MissingCredentials,

    /// Invalid credentials (wrong password or user not found).
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email supplied at registration is malformed.
    #[error("Please provide a valid email")]
    InvalidEmail,

    /// Username is already registered.
    #[error("Admin already exists")]
    AdminAlreadyExists,

    /// Self-service registration is turned off.
    #[error("Registration is disabled")]
    RegistrationDisabled,

    /// Token is malformed, has a bad signature, or has expired.
    #[error("Token is not valid")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    /// The configured TTL puts the expiry outside the representable date range.
    #[error("token expiry out of range")]
    TokenExpiryOutOfRange,

    /// Token could not be signed.
    #[error("token signing failed: {0}")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// True when the token was well-formed and correctly signed but has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken(e)
                if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature)
        )
    }
}
