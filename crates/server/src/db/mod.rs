//! Database operations for the lead tracker.
//!
//! # Schema: `crm`
//!
//! ## Tables
//!
//! - `lead` - Prospective customers tracked through the pipeline
//! - `admin_user` - Administrator credentials (Argon2id hashes)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p lead-tracker-cli -- migrate
//! ```
//!
//! Handlers never talk to `sqlx` directly: they go through the
//! [`LeadRepository`] and [`AdminRepository`] traits so the HTTP layer can be
//! exercised against the in-memory implementations in tests.

pub mod admins;
pub mod leads;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;

use std::time::Duration;

use futures::future::BoxFuture;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use lead_tracker_core::{LeadId, LeadStatus};

use crate::models::{Admin, Lead, NewLead};

pub use admins::PgAdminRepository;
pub use leads::PgLeadRepository;

/// Embedded migrations for the `crm` schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistent collection of leads.
///
/// Every method is a single statement; concurrent updates to the same lead
/// are last-write-wins.
pub trait LeadRepository: Send + Sync {
    /// Insert a validated lead and return the stored record.
    fn create(&self, lead: NewLead) -> BoxFuture<'_, Result<Lead, RepositoryError>>;

    /// All leads, newest first (ties broken by descending id).
    fn list_newest_first(&self) -> BoxFuture<'_, Result<Vec<Lead>, RepositoryError>>;

    /// Fetch one lead.
    fn get(&self, id: LeadId) -> BoxFuture<'_, Result<Option<Lead>, RepositoryError>>;

    /// Overwrite every mutable field of a lead. Returns `None` if it does not exist.
    fn update(
        &self,
        id: LeadId,
        lead: NewLead,
    ) -> BoxFuture<'_, Result<Option<Lead>, RepositoryError>>;

    /// Remove a lead. Returns `false` if it did not exist.
    fn delete(&self, id: LeadId) -> BoxFuture<'_, Result<bool, RepositoryError>>;

    /// Number of leads per status. Statuses with no leads may be omitted.
    fn count_by_status(&self) -> BoxFuture<'_, Result<Vec<(LeadStatus, i64)>, RepositoryError>>;

    /// Check that the backing store is reachable.
    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>>;
}

/// Fields needed to register an admin.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
}

/// An admin together with the stored password hash.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub admin: Admin,
    pub password_hash: String,
}

/// Persistent collection of administrator credentials.
pub trait AdminRepository: Send + Sync {
    /// Insert an admin.
    ///
    /// Fails with [`RepositoryError::Conflict`] if the username is taken.
    fn create(&self, admin: NewAdmin) -> BoxFuture<'_, Result<Admin, RepositoryError>>;

    /// Look up an admin and their password hash by exact username.
    fn find_credentials<'a>(
        &'a self,
        username: &'a str,
    ) -> BoxFuture<'a, Result<Option<AdminCredentials>, RepositoryError>>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
fn conflict_on_unique(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}
