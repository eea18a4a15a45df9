//! Admin domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lead_tracker_core::AdminId;

/// A registered administrator.
///
/// The password hash is not part of this type; only the login flow reads it,
/// through [`crate::db::AdminRepository::find_credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admin {
    pub id: AdminId,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

/// The admin identity carried by a verified login token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminId,
    /// Admin's username at the time the token was issued.
    pub username: String,
}
