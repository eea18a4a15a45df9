//! Lead repository backed by `PostgreSQL`.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use sqlx::PgPool;

use lead_tracker_core::{Email, LeadId, LeadPriority, LeadStatus};

use super::{LeadRepository, RepositoryError};
use crate::models::{Lead, NewLead};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `crm.lead` queries.
#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: i32,
    name: String,
    email: String,
    phone: String,
    company: String,
    source: String,
    status: LeadStatus,
    priority: LeadPriority,
    notes: String,
    follow_up_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LeadRow> for Lead {
    type Error = RepositoryError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: LeadId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            company: row.company,
            source: row.source,
            status: row.status,
            priority: row.priority,
            notes: row.notes,
            follow_up_date: row.follow_up_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for lead database operations.
#[derive(Debug, Clone)]
pub struct PgLeadRepository {
    pool: PgPool,
}

impl PgLeadRepository {
    /// Create a new lead repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn create_lead(&self, lead: NewLead) -> Result<Lead, RepositoryError> {
        let row = sqlx::query_as::<_, LeadRow>(
            r"
            INSERT INTO crm.lead
                (name, email, phone, company, source, status, priority, notes, follow_up_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, email, phone, company, source, status, priority, notes,
                      follow_up_date, created_at, updated_at
            ",
        )
        .bind(&lead.name)
        .bind(lead.email.as_str())
        .bind(&lead.phone)
        .bind(&lead.company)
        .bind(&lead.source)
        .bind(lead.status)
        .bind(lead.priority)
        .bind(&lead.notes)
        .bind(lead.follow_up_date)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, RepositoryError> {
        let rows = sqlx::query_as::<_, LeadRow>(
            r"
            SELECT id, name, email, phone, company, source, status, priority, notes,
                   follow_up_date, created_at, updated_at
            FROM crm.lead
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_lead(&self, id: LeadId) -> Result<Option<Lead>, RepositoryError> {
        let row = sqlx::query_as::<_, LeadRow>(
            r"
            SELECT id, name, email, phone, company, source, status, priority, notes,
                   follow_up_date, created_at, updated_at
            FROM crm.lead
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update_lead(&self, id: LeadId, lead: NewLead) -> Result<Option<Lead>, RepositoryError> {
        let row = sqlx::query_as::<_, LeadRow>(
            r"
            UPDATE crm.lead
            SET name = $2,
                email = $3,
                phone = $4,
                company = $5,
                source = $6,
                status = $7,
                priority = $8,
                notes = $9,
                follow_up_date = $10,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, phone, company, source, status, priority, notes,
                      follow_up_date, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&lead.name)
        .bind(lead.email.as_str())
        .bind(&lead.phone)
        .bind(&lead.company)
        .bind(&lead.source)
        .bind(lead.status)
        .bind(lead.priority)
        .bind(&lead.notes)
        .bind(lead.follow_up_date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete_lead(&self, id: LeadId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM crm.lead WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn status_counts(&self) -> Result<Vec<(LeadStatus, i64)>, RepositoryError> {
        let counts = sqlx::query_as::<_, (LeadStatus, i64)>(
            "SELECT status, COUNT(*) FROM crm.lead GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}

impl LeadRepository for PgLeadRepository {
    fn create(&self, lead: NewLead) -> BoxFuture<'_, Result<Lead, RepositoryError>> {
        self.create_lead(lead).boxed()
    }

    fn list_newest_first(&self) -> BoxFuture<'_, Result<Vec<Lead>, RepositoryError>> {
        self.list_leads().boxed()
    }

    fn get(&self, id: LeadId) -> BoxFuture<'_, Result<Option<Lead>, RepositoryError>> {
        self.get_lead(id).boxed()
    }

    fn update(
        &self,
        id: LeadId,
        lead: NewLead,
    ) -> BoxFuture<'_, Result<Option<Lead>, RepositoryError>> {
        self.update_lead(id, lead).boxed()
    }

    fn delete(&self, id: LeadId) -> BoxFuture<'_, Result<bool, RepositoryError>> {
        self.delete_lead(id).boxed()
    }

    fn count_by_status(&self) -> BoxFuture<'_, Result<Vec<(LeadStatus, i64)>, RepositoryError>> {
        self.status_counts().boxed()
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        async move {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        }
        .boxed()
    }
}
