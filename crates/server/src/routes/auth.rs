//! Admin registration and login handlers.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::models::Admin;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Registration form.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Login form.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response carrying only a status message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub admin: Admin,
}

/// Register an admin.
///
/// POST /api/auth/register
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.config().allow_registration {
        return Err(AuthError::RegistrationDisabled.into());
    }
    let Json(body) = payload?;

    AuthService::new(state.admins(), &state.config().auth)
        .register(
            body.username.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
            body.email.as_deref(),
        )
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Admin registered successfully".to_owned(),
    }))
}

/// Log in and receive a token.
///
/// POST /api/auth/login
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(body) = payload?;

    let success = AuthService::new(state.admins(), &state.config().auth)
        .login(
            body.username.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        token: success.token,
        admin: success.admin,
    }))
}
