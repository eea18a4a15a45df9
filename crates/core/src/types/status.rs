//! Enumerations for lead pipeline state.

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known enumeration value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: `{value}` (expected one of {expected})")]
pub struct UnknownVariant {
    /// Name of the enumeration being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Comma-separated list of accepted values.
    pub expected: &'static str,
}

/// Where a lead sits in the sales pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "crm.lead_status"))]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

impl LeadStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::Converted,
        Self::Lost,
    ];

    /// Display name, as stored and serialized.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::Converted => "Converted",
            Self::Lost => "Lost",
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_owned(),
                expected: "New, Contacted, Qualified, Converted, Lost",
            })
    }
}

/// How urgently a lead should be followed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "crm.lead_priority"))]
pub enum LeadPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl LeadPriority {
    /// Every priority, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Display name, as stored and serialized.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for LeadPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeadPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "priority",
                value: s.to_owned(),
                expected: "Low, Medium, High",
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(LeadStatus::default(), LeadStatus::New);
        assert_eq!(LeadPriority::default(), LeadPriority::Medium);
    }

    #[test]
    fn test_status_display_matches_from_str() {
        for status in LeadStatus::ALL {
            assert_eq!(status.to_string().parse::<LeadStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_priority_display_matches_from_str() {
        for priority in LeadPriority::ALL {
            assert_eq!(
                priority.to_string().parse::<LeadPriority>().unwrap(),
                priority
            );
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = "Archived".parse::<LeadStatus>().unwrap_err();
        assert_eq!(err.kind, "status");
        assert_eq!(err.value, "Archived");
        assert!(err.to_string().contains("Contacted"));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("new".parse::<LeadStatus>().is_err());
        assert!("HIGH".parse::<LeadPriority>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        assert_eq!(
            serde_json::to_string(&LeadStatus::Converted).unwrap(),
            "\"Converted\""
        );
        assert_eq!(
            serde_json::from_str::<LeadPriority>("\"High\"").unwrap(),
            LeadPriority::High
        );
    }
}
