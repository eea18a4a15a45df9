//! Admin authentication service.
//!
//! Username/password login backed by Argon2id hashes, issuing HS256 tokens
//! that the [`RequireAdmin`](crate::middleware::RequireAdmin) extractor checks
//! on protected routes.

mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use token::{Claims, issue_token, verify_token};

use lead_tracker_core::Email;
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::config::AuthConfig;
use crate::db::{AdminRepository, NewAdmin, RepositoryError};
use crate::models::{Admin, CurrentAdmin};

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub token: String,
    pub admin: Admin,
}

/// Admin authentication service.
pub struct AuthService<'a> {
    admins: &'a dyn AdminRepository,
    config: &'a AuthConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(admins: &'a dyn AdminRepository, config: &'a AuthConfig) -> Self {
        Self { admins, config }
    }

    /// Register a new admin with a password.
    ///
    /// # Errors
    ///
    /// See [`register_admin`].
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<Admin, AuthError> {
        register_admin(self.admins, username, password, email).await
    }

    /// Verify a username and password and issue a token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank.
    /// Returns `AuthError::InvalidCredentials` if the credentials don't match.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginSuccess, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(credentials) = self.admins.find_credentials(username).await? else {
            // Pay the same Argon2 cost as a real verification.
            let _ = verify_password(password.to_owned(), dummy_hash().await?.to_owned()).await;
            tracing::warn!("Login failed: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(e) = verify_password(password.to_owned(), credentials.password_hash).await {
            tracing::warn!(admin_id = %credentials.admin.id, "Login failed: wrong password");
            return Err(e);
        }

        let current = CurrentAdmin {
            id: credentials.admin.id,
            username: credentials.admin.username.clone(),
        };
        let token = issue_token(&current, self.config)?;

        tracing::info!(admin_id = %current.id, "Admin logged in");
        Ok(LoginSuccess {
            token,
            admin: credentials.admin,
        })
    }
}

/// Create an admin account.
///
/// Shared by `POST /api/auth/register` and the CLI so both apply the same
/// rules: username trimmed and non-blank, password non-blank, email (if any)
/// a valid address stored lowercased.
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` if username or password is blank.
/// Returns `AuthError::InvalidEmail` if a non-blank email does not parse.
/// Returns `AuthError::AdminAlreadyExists` if the username is taken.
#[instrument(skip(admins, password, email))]
pub async fn register_admin(
    admins: &dyn AdminRepository,
    username: &str,
    password: &str,
    email: Option<&str>,
) -> Result<Admin, AuthError> {
    let username = username.trim();
    if username.is_empty() || password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let email = email
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(|email| {
            Email::parse(email)
                .map(Email::into_inner)
                .map_err(|_| AuthError::InvalidEmail)
        })
        .transpose()?;

    let password_hash = hash_password(password.to_owned()).await?;

    let admin = admins
        .create(NewAdmin {
            username: username.to_owned(),
            password_hash,
            email,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::AdminAlreadyExists,
            other => AuthError::Repository(other),
        })?;

    tracing::info!(admin_id = %admin.id, "Admin registered");
    Ok(admin)
}

/// Hash checked against when the username is unknown.
async fn dummy_hash() -> Result<&'static str, AuthError> {
    static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

    DUMMY_HASH
        .get_or_try_init(|| hash_password("lead-tracker-unknown-admin".to_owned()))
        .await
        .map(String::as_str)
}
