//! Token authentication extractor.
//!
//! Provides the extractor that guards the admin-only lead routes.

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap,
        header::AUTHORIZATION,
        request::Parts,
    },
};

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentAdmin;
use crate::services::auth::verify_token;
use crate::state::AppState;

/// Primary header carrying the login token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Message for requests without a token.
pub const MISSING_TOKEN_MESSAGE: &str = "No token, authorization denied";

/// Extractor that requires a valid admin token.
///
/// The token is read from `x-auth-token`, falling back to
/// `Authorization: Bearer <token>`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized(MISSING_TOKEN_MESSAGE.to_owned()))?;

        let admin = verify_token(token, &state.config().auth).map_err(|e| {
            tracing::warn!(expired = e.is_expired(), "Rejected admin token");
            AppError::from(e)
        })?;

        set_sentry_user(admin.id.as_i32(), &admin.username);
        Ok(Self(admin))
    }
}

/// Find the token in the request headers.
///
/// Blank values are treated as absent.
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let direct = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty());

    direct.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    })
}
