//! Lead API handlers.
//!
//! Creation (including the contact form) is public; everything else requires
//! an admin token.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::Serialize;
use tracing::instrument;

use lead_tracker_core::LeadId;

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::{ContactSubmission, Lead, LeadInput, LeadStats};
use crate::services::{LeadError, LeadService};
use crate::state::AppState;

/// Build the leads router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/leads", post(create_lead).get(list_leads))
        .route("/api/leads/stats/summary", get(stats_summary))
        .route(
            "/api/leads/{id}",
            get(get_lead).put(update_lead).delete(delete_lead),
        )
        .route("/api/contact", post(submit_contact))
}

/// A single lead with a status message.
#[derive(Debug, Serialize)]
pub struct LeadMessageResponse {
    pub success: bool,
    pub message: String,
    pub lead: Lead,
}

/// A single lead.
#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub success: bool,
    pub lead: Lead,
}

/// All leads.
#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub success: bool,
    pub count: usize,
    pub leads: Vec<Lead>,
}

/// Deletion confirmation.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Dashboard summary.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: LeadStats,
}

/// Path ids that are not positive integers can never match a lead.
fn parse_lead_id(raw: &str) -> Result<LeadId, AppError> {
    raw.parse().map_err(|_| LeadError::NotFound.into())
}

/// POST /api/leads
#[instrument(skip(state, payload))]
pub async fn create_lead(
    State(state): State<AppState>,
    payload: Result<Json<LeadInput>, JsonRejection>,
) -> Result<Json<LeadMessageResponse>, AppError> {
    let Json(input) = payload?;
    let lead = LeadService::new(state.leads()).create(input).await?;

    Ok(Json(LeadMessageResponse {
        success: true,
        message: "Lead created successfully".to_owned(),
        lead,
    }))
}

/// POST /api/contact
#[instrument(skip(state, payload))]
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<LeadMessageResponse>, AppError> {
    let Json(submission) = payload?;
    let lead = LeadService::new(state.leads())
        .submit_contact(submission)
        .await?;

    Ok(Json(LeadMessageResponse {
        success: true,
        message: "Thank you! We will be in touch soon.".to_owned(),
        lead,
    }))
}

/// GET /api/leads
#[instrument(skip(state, _admin))]
pub async fn list_leads(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<LeadListResponse>, AppError> {
    let leads = LeadService::new(state.leads()).list().await?;

    Ok(Json(LeadListResponse {
        success: true,
        count: leads.len(),
        leads,
    }))
}

/// GET /api/leads/{id}
#[instrument(skip(state, _admin))]
pub async fn get_lead(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LeadResponse>, AppError> {
    let id = parse_lead_id(&id)?;
    let lead = LeadService::new(state.leads()).get(id).await?;

    Ok(Json(LeadResponse {
        success: true,
        lead,
    }))
}

/// PUT /api/leads/{id}
#[instrument(skip(state, admin, payload), fields(admin = %admin.username))]
pub async fn update_lead(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LeadInput>, JsonRejection>,
) -> Result<Json<LeadMessageResponse>, AppError> {
    let id = parse_lead_id(&id)?;
    let Json(input) = payload?;
    let lead = LeadService::new(state.leads()).update(id, input).await?;

    Ok(Json(LeadMessageResponse {
        success: true,
        message: "Lead updated successfully".to_owned(),
        lead,
    }))
}

/// DELETE /api/leads/{id}
#[instrument(skip(state, admin), fields(admin = %admin.username))]
pub async fn delete_lead(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_lead_id(&id)?;
    LeadService::new(state.leads()).delete(id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "Lead deleted successfully".to_owned(),
    }))
}

/// GET /api/leads/stats/summary
#[instrument(skip(state, _admin))]
pub async fn stats_summary(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = LeadService::new(state.leads()).stats().await?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
