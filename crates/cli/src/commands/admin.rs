//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! leads-cli admin create -u alice -p 'correct horse battery staple' -e alice@example.com
//! ```
//!
//! Works regardless of `ALLOW_REGISTRATION`, so it is the way to provision
//! the first admin when self-service registration is disabled.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use lead_tracker_core::AdminId;
use lead_tracker_server::db::{PgAdminRepository, create_pool};
use lead_tracker_server::services::auth::{AuthError, register_admin};
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// User already exists.
    #[error("Admin already exists with username: {0}")]
    UserExists(String),

    /// Registration rejected (blank fields, bad email, hashing or storage failure).
    #[error("{0}")]
    Registration(AuthError),
}

/// Create a new admin account.
///
/// Applies the same rules as `POST /api/auth/register`, but ignores
/// `ALLOW_REGISTRATION`.
///
/// # Arguments
///
/// * `username` - Login name (trimmed, must be unique)
/// * `password` - Plain-text password, stored as an Argon2id hash
/// * `email` - Optional contact email
///
/// # Returns
///
/// The ID of the created admin.
pub async fn create_user(
    username: &str,
    password: &str,
    email: Option<&str>,
) -> Result<AdminId, AdminError> {
    let database_url = super::database_url().ok_or(AdminError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    let admins = PgAdminRepository::new(pool);

    tracing::info!("Creating admin: {}", username.trim());
    let admin = register_admin(&admins, username, password, email)
        .await
        .map_err(|e| match e {
            AuthError::AdminAlreadyExists => AdminError::UserExists(username.trim().to_owned()),
            other => AdminError::Registration(other),
        })?;

    tracing::info!(
        "Admin created successfully! ID: {}, Username: {}",
        admin.id,
        admin.username
    );

    Ok(admin.id)
}
