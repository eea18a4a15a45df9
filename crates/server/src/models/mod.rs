//! Domain models for the lead tracker.
//!
//! These are validated domain objects; database row types live in [`crate::db`].

pub mod admin;
pub mod lead;

pub use admin::{Admin, CurrentAdmin};
pub use lead::{ContactSubmission, Lead, LeadInput, LeadStats, LeadValidationError, NewLead};
