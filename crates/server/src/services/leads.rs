//! Lead pipeline operations.
//!
//! Validation happens here, before anything reaches the repository.

use thiserror::Error;
use tracing::instrument;

use lead_tracker_core::LeadId;

use crate::db::{LeadRepository, RepositoryError};
use crate::models::{ContactSubmission, Lead, LeadInput, LeadStats, LeadValidationError, NewLead};

/// Errors from lead operations.
#[derive(Debug, Error)]
pub enum LeadError {
    #[error(transparent)]
    Validation(#[from] LeadValidationError),

    #[error("Lead not found")]
    NotFound,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Lead service.
pub struct LeadService<'a> {
    leads: &'a dyn LeadRepository,
}

impl<'a> LeadService<'a> {
    /// Create a new lead service.
    #[must_use]
    pub const fn new(leads: &'a dyn LeadRepository) -> Self {
        Self { leads }
    }

    /// Validate and store a new lead.
    ///
    /// # Errors
    ///
    /// Returns `LeadError::Validation` for an invalid payload.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: LeadInput) -> Result<Lead, LeadError> {
        let lead = self.leads.create(NewLead::from_input(input)?).await?;
        tracing::info!(lead_id = %lead.id, source = %lead.source, "Lead created");
        Ok(lead)
    }

    /// Store a contact-form submission as a new website lead.
    ///
    /// # Errors
    ///
    /// Returns `LeadError::Validation` if name or email is missing or invalid.
    #[instrument(skip(self, submission))]
    pub async fn submit_contact(&self, submission: ContactSubmission) -> Result<Lead, LeadError> {
        self.create(submission.into()).await
    }

    /// All leads, newest first.
    ///
    /// # Errors
    ///
    /// Returns `LeadError::Repository` if the store fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Lead>, LeadError> {
        Ok(self.leads.list_newest_first().await?)
    }

    /// # Errors
    ///
    /// Returns `LeadError::NotFound` if no lead has this id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: LeadId) -> Result<Lead, LeadError> {
        self.leads.get(id).await?.ok_or(LeadError::NotFound)
    }

    /// Merge `input` over the stored lead and write the result.
    ///
    /// # Errors
    ///
    /// Returns `LeadError::NotFound` if the lead does not exist (including when it
    /// is deleted between the read and the write) or `LeadError::Validation` if the
    /// merged lead is invalid.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: LeadId, input: LeadInput) -> Result<Lead, LeadError> {
        let existing = self.get(id).await?;
        let merged = NewLead::merge(&existing, input)?;
        let lead = self
            .leads
            .update(id, merged)
            .await?
            .ok_or(LeadError::NotFound)?;

        tracing::info!(lead_id = %lead.id, status = %lead.status, "Lead updated");
        Ok(lead)
    }

    /// # Errors
    ///
    /// Returns `LeadError::NotFound` if no lead has this id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: LeadId) -> Result<(), LeadError> {
        if !self.leads.delete(id).await? {
            return Err(LeadError::NotFound);
        }
        tracing::info!(lead_id = %id, "Lead deleted");
        Ok(())
    }

    /// Dashboard summary counts.
    ///
    /// # Errors
    ///
    /// Returns `LeadError::Repository` if the store fails.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<LeadStats, LeadError> {
        Ok(LeadStats::from_counts(self.leads.count_by_status().await?))
    }
}
