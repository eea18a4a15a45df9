//! Lead domain types and validation.
//!
//! Incoming payloads arrive as a loosely-typed [`LeadInput`]; [`NewLead`] is
//! the validated form that repositories accept. Defaults for omitted fields
//! are applied while building a `NewLead`, never by the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lead_tracker_core::{Email, EmailError, LeadId, LeadPriority, LeadStatus, UnknownVariant};

/// Source recorded when a payload does not name one.
pub const DEFAULT_SOURCE: &str = "Website";

/// A stored lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub company: String,
    pub source: String,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub notes: String,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw lead fields as submitted by a client.
///
/// Every field is optional so that missing and malformed values produce
/// a [`LeadValidationError`] rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; an empty string clears the date.
    pub follow_up_date: Option<String>,
}

/// Reasons a lead payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeadValidationError {
    #[error("Name is required")]
    MissingName,

    #[error("Email is required")]
    MissingEmail,

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error(transparent)]
    InvalidStatus(UnknownVariant),

    #[error(transparent)]
    InvalidPriority(UnknownVariant),

    #[error("Invalid follow-up date `{0}`: expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidFollowUpDate(String),
}

/// A validated lead, ready to be inserted or written over an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub company: String,
    pub source: String,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub notes: String,
    pub follow_up_date: Option<DateTime<Utc>>,
}

impl NewLead {
    /// Validate a fresh payload, applying defaults for omitted optional fields.
    ///
    /// # Errors
    ///
    /// Returns a [`LeadValidationError`] if `name` or `email` is missing or blank,
    /// the email is malformed, `status`/`priority` is not a known value, or the
    /// follow-up date cannot be parsed.
    pub fn from_input(input: LeadInput) -> Result<Self, LeadValidationError> {
        Ok(Self {
            name: required_name(input.name.as_deref())?,
            email: required_email(input.email.as_deref())?,
            phone: input.phone.unwrap_or_default(),
            company: input.company.unwrap_or_default(),
            source: input.source.unwrap_or_else(|| DEFAULT_SOURCE.to_owned()),
            status: parse_status(input.status.as_deref())?.unwrap_or_default(),
            priority: parse_priority(input.priority.as_deref())?.unwrap_or_default(),
            notes: input.notes.unwrap_or_default(),
            follow_up_date: parse_follow_up_date(input.follow_up_date.as_deref())?.flatten(),
        })
    }

    /// Overlay a payload onto an existing lead and re-validate the result.
    ///
    /// Fields absent from `input` keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns a [`LeadValidationError`] under the same rules as [`NewLead::from_input`],
    /// applied to the provided fields.
    pub fn merge(existing: &Lead, input: LeadInput) -> Result<Self, LeadValidationError> {
        let name = match input.name.as_deref() {
            Some(name) => required_name(Some(name))?,
            None => existing.name.clone(),
        };
        let email = match input.email.as_deref() {
            Some(email) => required_email(Some(email))?,
            None => existing.email.clone(),
        };
        let follow_up_date = match parse_follow_up_date(input.follow_up_date.as_deref())? {
            Some(date) => date,
            None => existing.follow_up_date,
        };

        Ok(Self {
            name,
            email,
            phone: input.phone.unwrap_or_else(|| existing.phone.clone()),
            company: input.company.unwrap_or_else(|| existing.company.clone()),
            source: input.source.unwrap_or_else(|| existing.source.clone()),
            status: parse_status(input.status.as_deref())?.unwrap_or(existing.status),
            priority: parse_priority(input.priority.as_deref())?.unwrap_or(existing.priority),
            notes: input.notes.unwrap_or_else(|| existing.notes.clone()),
            follow_up_date,
        })
    }
}

/// A submission from the public contact form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl From<ContactSubmission> for LeadInput {
    /// Contact-form leads always enter the pipeline as new, medium-priority website leads.
    fn from(submission: ContactSubmission) -> Self {
        Self {
            name: submission.name,
            email: submission.email,
            notes: submission.message,
            source: Some(DEFAULT_SOURCE.to_owned()),
            status: Some(LeadStatus::New.to_string()),
            priority: Some(LeadPriority::Medium.to_string()),
            ..Self::default()
        }
    }
}

/// Dashboard summary counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: i64,
    pub new: i64,
    pub contacted: i64,
    pub converted: i64,
}

impl LeadStats {
    /// Fold per-status counts into the summary.
    ///
    /// `total` covers every status, including the ones without their own bucket.
    pub fn from_counts(counts: impl IntoIterator<Item = (LeadStatus, i64)>) -> Self {
        counts
            .into_iter()
            .fold(Self::default(), |mut stats, (status, count)| {
                stats.total += count;
                match status {
                    LeadStatus::New => stats.new += count,
                    LeadStatus::Contacted => stats.contacted += count,
                    LeadStatus::Converted => stats.converted += count,
                    LeadStatus::Qualified | LeadStatus::Lost => {}
                }
                stats
            })
    }
}

fn required_name(name: Option<&str>) -> Result<String, LeadValidationError> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_owned()),
        _ => Err(LeadValidationError::MissingName),
    }
}

fn required_email(email: Option<&str>) -> Result<Email, LeadValidationError> {
    match email.map(str::trim) {
        Some(email) if !email.is_empty() => Ok(Email::parse(email)?),
        _ => Err(LeadValidationError::MissingEmail),
    }
}

fn parse_status(status: Option<&str>) -> Result<Option<LeadStatus>, LeadValidationError> {
    status
        .map(str::parse)
        .transpose()
        .map_err(LeadValidationError::InvalidStatus)
}

fn parse_priority(priority: Option<&str>) -> Result<Option<LeadPriority>, LeadValidationError> {
    priority
        .map(str::parse)
        .transpose()
        .map_err(LeadValidationError::InvalidPriority)
}

/// `None`: field absent. `Some(None)`: explicitly cleared. `Some(Some(_))`: a date.
fn parse_follow_up_date(
    raw: Option<&str>,
) -> Result<Option<Option<DateTime<Utc>>>, LeadValidationError> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(Some(None));
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(Some(timestamp.with_timezone(&Utc))));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(Some(midnight.and_utc())))
        .ok_or_else(|| LeadValidationError::InvalidFollowUpDate(raw.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn input(name: &str, email: &str) -> LeadInput {
        LeadInput {
            name: Some(name.to_owned()),
            email: Some(email.to_owned()),
            ..LeadInput::default()
        }
    }

    fn stored_lead() -> Lead {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        Lead {
            id: LeadId::new(1),
            name: "Ada Lovelace".to_owned(),
            email: Email::parse("ada@engine.io").unwrap(),
            phone: "555-0100".to_owned(),
            company: "Analytical Engines".to_owned(),
            source: "Referral".to_owned(),
            status: LeadStatus::Contacted,
            priority: LeadPriority::High,
            notes: "Call back Tuesday".to_owned(),
            follow_up_date: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_defaults_applied_for_omitted_fields() {
        let lead = NewLead::from_input(input("Jane", "jane@x.com")).unwrap();

        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.priority, LeadPriority::Medium);
        assert_eq!(lead.source, "Website");
        assert_eq!(lead.phone, "");
        assert_eq!(lead.company, "");
        assert_eq!(lead.notes, "");
        assert_eq!(lead.follow_up_date, None);
    }

    #[test]
    fn test_provided_enums_are_kept() {
        let mut payload = input("Jane", "jane@x.com");
        payload.status = Some("Qualified".to_owned());
        payload.priority = Some("Low".to_owned());

        let lead = NewLead::from_input(payload).unwrap();
        assert_eq!(lead.status, LeadStatus::Qualified);
        assert_eq!(lead.priority, LeadPriority::Low);
    }

    #[test]
    fn test_name_is_trimmed_and_email_normalized() {
        let lead = NewLead::from_input(input("  Jane Doe ", " Jane@X.COM ")).unwrap();
        assert_eq!(lead.name, "Jane Doe");
        assert_eq!(lead.email.as_str(), "jane@x.com");
    }

    #[test]
    fn test_missing_required_fields() {
        assert_eq!(
            NewLead::from_input(LeadInput {
                email: Some("a@b.c".to_owned()),
                ..LeadInput::default()
            }),
            Err(LeadValidationError::MissingName)
        );
        assert_eq!(
            NewLead::from_input(input("   ", "a@b.c")),
            Err(LeadValidationError::MissingName)
        );
        assert_eq!(
            NewLead::from_input(input("Jane", "")),
            Err(LeadValidationError::MissingEmail)
        );
    }

    #[test]
    fn test_malformed_email_rejected() {
        assert_eq!(
            NewLead::from_input(input("Jane", "not-an-email")),
            Err(LeadValidationError::InvalidEmail(EmailError::MissingAtSymbol))
        );
    }

    #[test]
    fn test_unknown_status_and_priority_rejected() {
        let mut payload = input("Jane", "jane@x.com");
        payload.status = Some("Archived".to_owned());
        assert!(matches!(
            NewLead::from_input(payload),
            Err(LeadValidationError::InvalidStatus(_))
        ));

        let mut payload = input("Jane", "jane@x.com");
        payload.priority = Some("Urgent".to_owned());
        assert!(matches!(
            NewLead::from_input(payload),
            Err(LeadValidationError::InvalidPriority(_))
        ));
    }

    #[test]
    fn test_follow_up_date_formats() {
        let mut payload = input("Jane", "jane@x.com");
        payload.follow_up_date = Some("2026-05-04".to_owned());
        let lead = NewLead::from_input(payload).unwrap();
        assert_eq!(
            lead.follow_up_date,
            Some(Utc.with_ymd_and_hms(2026, 5, 4, 0, 0, 0).unwrap())
        );

        let mut payload = input("Jane", "jane@x.com");
        payload.follow_up_date = Some("2026-05-04T15:00:00+02:00".to_owned());
        let lead = NewLead::from_input(payload).unwrap();
        assert_eq!(
            lead.follow_up_date,
            Some(Utc.with_ymd_and_hms(2026, 5, 4, 13, 0, 0).unwrap())
        );

        let mut payload = input("Jane", "jane@x.com");
        payload.follow_up_date = Some(String::new());
        assert_eq!(NewLead::from_input(payload).unwrap().follow_up_date, None);

        let mut payload = input("Jane", "jane@x.com");
        payload.follow_up_date = Some("next week".to_owned());
        assert!(matches!(
            NewLead::from_input(payload),
            Err(LeadValidationError::InvalidFollowUpDate(_))
        ));
    }

    #[test]
    fn test_merge_keeps_omitted_fields() {
        let existing = stored_lead();
        let merged = NewLead::merge(
            &existing,
            LeadInput {
                status: Some("Converted".to_owned()),
                notes: Some("Signed the contract".to_owned()),
                ..LeadInput::default()
            },
        )
        .unwrap();

        assert_eq!(merged.status, LeadStatus::Converted);
        assert_eq!(merged.notes, "Signed the contract");
        assert_eq!(merged.name, existing.name);
        assert_eq!(merged.email, existing.email);
        assert_eq!(merged.priority, LeadPriority::High);
        assert_eq!(merged.source, "Referral");
        assert_eq!(merged.follow_up_date, existing.follow_up_date);
    }

    #[test]
    fn test_merge_revalidates_provided_fields() {
        let existing = stored_lead();
        let result = NewLead::merge(
            &existing,
            LeadInput {
                name: Some(String::new()),
                ..LeadInput::default()
            },
        );
        assert_eq!(result, Err(LeadValidationError::MissingName));

        let result = NewLead::merge(
            &existing,
            LeadInput {
                priority: Some("Critical".to_owned()),
                ..LeadInput::default()
            },
        );
        assert!(matches!(result, Err(LeadValidationError::InvalidPriority(_))));
    }

    #[test]
    fn test_merge_can_clear_follow_up_date() {
        let merged = NewLead::merge(
            &stored_lead(),
            LeadInput {
                follow_up_date: Some(String::new()),
                ..LeadInput::default()
            },
        )
        .unwrap();
        assert_eq!(merged.follow_up_date, None);
    }

    #[test]
    fn test_contact_submission_forces_pipeline_defaults() {
        let submission = ContactSubmission {
            name: Some("Jane".to_owned()),
            email: Some("jane@x.com".to_owned()),
            message: Some("hi".to_owned()),
        };

        let lead = NewLead::from_input(submission.into()).unwrap();
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.priority, LeadPriority::Medium);
        assert_eq!(lead.source, "Website");
        assert_eq!(lead.notes, "hi");
    }

    #[test]
    fn test_stats_from_counts() {
        let stats = LeadStats::from_counts([
            (LeadStatus::New, 4),
            (LeadStatus::Contacted, 2),
            (LeadStatus::Qualified, 1),
            (LeadStatus::Converted, 3),
            (LeadStatus::Lost, 5),
        ]);

        assert_eq!(
            stats,
            LeadStats {
                total: 15,
                new: 4,
                contacted: 2,
                converted: 3,
            }
        );
    }

    #[test]
    fn test_stats_from_no_leads() {
        assert_eq!(LeadStats::from_counts([]), LeadStats::default());
    }

    #[test]
    fn test_lead_serializes_camel_case() {
        let json = serde_json::to_value(stored_lead()).unwrap();
        assert_eq!(json["status"], "Contacted");
        assert_eq!(json["priority"], "High");
        assert!(json.get("followUpDate").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("follow_up_date").is_none());
    }
}
