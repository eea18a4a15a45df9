//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (store reachable)
//! GET    /api                       - API banner
//!
//! # Auth
//! POST   /api/auth/register         - Register an admin (if enabled)
//! POST   /api/auth/login            - Exchange credentials for a token
//!
//! # Leads
//! POST   /api/leads                 - Create a lead (public)
//! POST   /api/contact               - Contact form submission (public)
//! GET    /api/leads                 - List leads, newest first
//! GET    /api/leads/stats/summary   - Dashboard counts
//! GET    /api/leads/{id}            - Lead detail
//! PUT    /api/leads/{id}            - Update a lead
//! DELETE /api/leads/{id}            - Delete a lead
//!
//! # Dashboard
//! GET    /*                         - SPA assets, `index.html` fallback
//! ```

pub mod auth;
pub mod leads;

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{AUTH_TOKEN_HEADER, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Build the API router (no layers, no static files).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/api", get(api_root))
        .merge(auth::router())
        .merge(leads::router())
}

/// Build the complete application: routes, dashboard assets and middleware.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    let cors = cors_layer(config.cors_allowed_origins.as_deref());

    let dashboard = config
        .static_dir
        .as_ref()
        .map(|dir| ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))));

    routes()
        .fallback(move |request: Request| fallback(dashboard.clone(), request))
        .layer(cors)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// CORS policy: permissive unless an allowlist is configured.
fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = allowed_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(AUTH_TOKEN_HEADER),
        ])
        .max_age(Duration::from_secs(60 * 60))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the lead store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.leads().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET /api
async fn api_root() -> Json<Value> {
    Json(json!({ "message": "CRM API is running" }))
}

/// Serve the dashboard for unmatched paths.
///
/// Unknown `/api` paths (and everything, when static serving is disabled)
/// get a JSON 404 instead.
async fn fallback(dashboard: Option<ServeDir<ServeFile>>, request: Request) -> Response {
    let is_api = request.uri().path() == "/api" || request.uri().path().starts_with("/api/");
    match dashboard {
        Some(dashboard) if !is_api => match dashboard.oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        },
        _ => AppError::NotFound("Route not found".to_owned()).into_response(),
    }
}
