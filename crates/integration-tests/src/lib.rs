//! Integration tests for Lead Tracker.
//!
//! # Running Tests
//!
//! ```bash
//! # HTTP tests against the in-process router (no database needed)
//! cargo test -p lead-tracker-integration-tests
//!
//! # Postgres repository tests
//! DATABASE_URL=postgres://... cargo test -p lead-tracker-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth_api` - Registration, login and the token guard
//! - `leads_api` - Lead CRUD, contact form and stats
//! - `postgres_repository` - Repositories against a real database

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use lead_tracker_server::db::LeadRepository;
use lead_tracker_server::db::memory::{InMemoryAdminRepository, InMemoryLeadRepository};
use lead_tracker_server::{AppState, ServerConfig, app};
use serde_json::Value;
use tower::ServiceExt;

/// Signing secret used by every test server.
pub const TEST_JWT_SECRET: &str = "kX9#mQ2$vL7@pR4&nW8*jT3!hY6^bF1%";

/// Response status and parsed JSON body (`Null` for non-JSON bodies).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// An in-process server backed by in-memory repositories.
pub struct TestContext {
    router: Router,
    pub leads: Arc<InMemoryLeadRepository>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Server with the default test configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing(TEST_JWT_SECRET))
    }

    /// Server with a custom configuration.
    #[must_use]
    pub fn with_config(config: ServerConfig) -> Self {
        let leads = Arc::new(InMemoryLeadRepository::new());
        let state = AppState::with_repositories(
            config,
            leads.clone(),
            Arc::new(InMemoryAdminRepository::new()),
        );
        Self {
            router: app(state),
            leads,
        }
    }

    /// Send a request with an optional JSON body and token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("x-auth-token", token);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    /// Send a prebuilt request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: &Value, token: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), token).await
    }

    pub async fn put(&self, uri: &str, body: &Value, token: &str) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), Some(token)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, Some(token)).await
    }

    /// Register `username`/`password` and return a fresh login token.
    pub async fn admin_token(&self, username: &str, password: &str) -> String {
        let credentials = serde_json::json!({ "username": username, "password": password });

        let registered = self.post("/api/auth/register", &credentials, None).await;
        assert_eq!(registered.status, StatusCode::OK, "{:?}", registered.body);

        let login = self.post("/api/auth/login", &credentials, None).await;
        assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);
        login.body["token"].as_str().unwrap().to_owned()
    }

    /// Number of leads currently stored.
    pub async fn leads_count(&self) -> usize {
        self.leads.list_newest_first().await.unwrap().len()
    }

    /// Create a lead through the public endpoint and return its JSON.
    pub async fn create_lead(&self, body: &Value) -> Value {
        let created = self.post("/api/leads", body, None).await;
        assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
        created.body["lead"].clone()
    }
}
