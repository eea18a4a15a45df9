//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Admin registration, password login and token issuance
//! - `leads` - Lead validation and pipeline operations

pub mod auth;
pub mod leads;

pub use auth::{AuthError, AuthService, LoginSuccess};
pub use leads::{LeadError, LeadService};
