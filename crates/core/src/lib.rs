//! Lead Tracker Core - Shared types library.
//!
//! This crate provides common types used across all Lead Tracker components:
//! - `server` - REST API and static dashboard host
//! - `cli` - Command-line tools for migrations and admin provisioning
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Database encoding is opt-in via the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and lead enumerations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
