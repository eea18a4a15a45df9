//! Lead Tracker server library.
//!
//! REST API for capturing and managing sales leads, plus hosting for the
//! dashboard SPA. Exposed as a library so the router can be driven in-process
//! by tests.
//!
//! # Security
//!
//! - Admin routes require an HS256 token (`x-auth-token` or `Authorization: Bearer`)
//! - Passwords are stored as Argon2id hashes
//! - Self-service registration can be turned off with `ALLOW_REGISTRATION=false`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use routes::app;
pub use state::AppState;
