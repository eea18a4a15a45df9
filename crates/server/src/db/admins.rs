//! Admin user repository backed by `PostgreSQL`.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use sqlx::PgPool;

use lead_tracker_core::AdminId;

use super::{AdminCredentials, AdminRepository, NewAdmin, RepositoryError, conflict_on_unique};
use crate::models::Admin;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `crm.admin_user` queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i32,
    username: String,
    password_hash: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AdminRow> for AdminCredentials {
    fn from(row: AdminRow) -> Self {
        Self {
            admin: Admin {
                id: AdminId::new(row.id),
                username: row.username,
                email: row.email,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin user database operations.
#[derive(Debug, Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, admin: NewAdmin) -> Result<Admin, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"
            INSERT INTO crm.admin_user (username, password_hash, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, email, created_at, updated_at
            ",
        )
        .bind(&admin.username)
        .bind(&admin.password_hash)
        .bind(admin.email.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "username already exists"))?;

        Ok(AdminCredentials::from(row).admin)
    }

    async fn credentials_for(
        &self,
        username: &str,
    ) -> Result<Option<AdminCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"
            SELECT id, username, password_hash, email, created_at, updated_at
            FROM crm.admin_user
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AdminCredentials::from))
    }
}

impl AdminRepository for PgAdminRepository {
    fn create(&self, admin: NewAdmin) -> BoxFuture<'_, Result<Admin, RepositoryError>> {
        self.insert(admin).boxed()
    }

    fn find_credentials<'a>(
        &'a self,
        username: &'a str,
    ) -> BoxFuture<'a, Result<Option<AdminCredentials>, RepositoryError>> {
        self.credentials_for(username).boxed()
    }
}
