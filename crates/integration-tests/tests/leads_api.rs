//! Integration tests for the lead API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use lead_tracker_integration_tests::TestContext;
use serde_json::{Value, json};

async fn ctx_with_token() -> (TestContext, String) {
    let ctx = TestContext::new();
    let token = ctx.admin_token("admin", "pw123").await;
    (ctx, token)
}

fn lead_id(lead: &Value) -> i64 {
    lead["id"].as_i64().unwrap()
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_lead_applies_defaults() {
    let ctx = TestContext::new();
    let resp = ctx
        .post(
            "/api/leads",
            &json!({ "name": "Jane Doe", "email": "Jane@Example.com" }),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);
    let lead = &resp.body["lead"];
    assert_eq!(lead["name"], "Jane Doe");
    assert_eq!(lead["email"], "jane@example.com");
    assert_eq!(lead["status"], "New");
    assert_eq!(lead["priority"], "Medium");
    assert_eq!(lead["source"], "Website");
    assert_eq!(lead["phone"], "");
    assert_eq!(lead["company"], "");
    assert_eq!(lead["notes"], "");
    assert!(lead["followUpDate"].is_null());
    assert!(lead["createdAt"].is_string());
    assert!(lead["updatedAt"].is_string());
}

#[tokio::test]
async fn test_create_lead_keeps_provided_values() {
    let ctx = TestContext::new();

    for (status, priority) in [("Qualified", "High"), ("Lost", "Low"), ("Converted", "Medium")] {
        let lead = ctx
            .create_lead(&json!({
                "name": "Sam",
                "email": "sam@example.com",
                "status": status,
                "priority": priority,
                "source": "Referral",
                "followUpDate": "2026-11-02",
            }))
            .await;
        assert_eq!(lead["status"], status);
        assert_eq!(lead["priority"], priority);
        assert_eq!(lead["source"], "Referral");
        assert!(lead["followUpDate"].as_str().unwrap().starts_with("2026-11-02"));
    }
}

#[tokio::test]
async fn test_create_lead_validation_errors() {
    let ctx = TestContext::new();

    let cases = [
        (json!({ "email": "a@b.co" }), "Name is required"),
        (json!({ "name": "A" }), "Email is required"),
        (json!({ "name": "  ", "email": "a@b.co" }), "Name is required"),
    ];
    for (body, message) in cases {
        let resp = ctx.post("/api/leads", &body, None).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(resp.body["success"], false);
        assert_eq!(resp.body["message"], message);
    }

    for body in [
        json!({ "name": "A", "email": "no-at-sign" }),
        json!({ "name": "A", "email": "a@b.co", "status": "Archived" }),
        json!({ "name": "A", "email": "a@b.co", "priority": "urgent" }),
        json!({ "name": "A", "email": "a@b.co", "followUpDate": "soon" }),
    ] {
        let resp = ctx.post("/api/leads", &body, None).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{body}");
        assert!(resp.body["message"].is_string());
    }

    assert_eq!(ctx.leads_count().await, 0);
}

#[tokio::test]
async fn test_contact_form_scenario() {
    let (ctx, token) = ctx_with_token().await;

    let resp = ctx
        .post(
            "/api/contact",
            &json!({ "name": "Jane", "email": "jane@x.com", "message": "hi" }),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let id = lead_id(&resp.body["lead"]);
    let stored = ctx.get(&format!("/api/leads/{id}"), Some(&token)).await;
    assert_eq!(stored.status, StatusCode::OK);
    let lead = &stored.body["lead"];
    assert_eq!(lead["status"], "New");
    assert_eq!(lead["priority"], "Medium");
    assert_eq!(lead["source"], "Website");
    assert_eq!(lead["notes"], "hi");
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
async fn test_list_leads_newest_first_with_count() {
    let (ctx, token) = ctx_with_token().await;
    for name in ["first", "second", "third"] {
        ctx.create_lead(&json!({ "name": name, "email": format!("{name}@x.com") }))
            .await;
    }

    let resp = ctx.get("/api/leads", Some(&token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["count"], 3);

    let names: Vec<&str> = resp.body["leads"]
        .as_array()
        .unwrap()
        .iter()
        .map(|lead| lead["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["third", "second", "first"]);
}

#[tokio::test]
async fn test_get_lead_not_found_and_invalid_id() {
    let (ctx, token) = ctx_with_token().await;

    for uri in ["/api/leads/999", "/api/leads/not-an-id", "/api/leads/-1", "/api/leads/0"] {
        let resp = ctx.get(uri, Some(&token)).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(resp.body["message"], "Lead not found");
    }
}

#[tokio::test]
async fn test_reads_require_auth() {
    let ctx = TestContext::new();
    let lead = ctx
        .create_lead(&json!({ "name": "A", "email": "a@x.com" }))
        .await;

    for uri in [
        "/api/leads".to_owned(),
        format!("/api/leads/{}", lead_id(&lead)),
        "/api/leads/stats/summary".to_owned(),
    ] {
        assert_eq!(ctx.get(&uri, None).await.status, StatusCode::UNAUTHORIZED);
    }
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_merges_fields() {
    let (ctx, token) = ctx_with_token().await;
    let lead = ctx
        .create_lead(&json!({
            "name": "Jane",
            "email": "jane@x.com",
            "company": "Acme",
            "priority": "High",
        }))
        .await;
    let id = lead_id(&lead);

    let resp = ctx
        .put(
            &format!("/api/leads/{id}"),
            &json!({ "status": "Contacted", "notes": "Left voicemail" }),
            &token,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);

    let updated = &resp.body["lead"];
    assert_eq!(updated["status"], "Contacted");
    assert_eq!(updated["notes"], "Left voicemail");
    assert_eq!(updated["company"], "Acme");
    assert_eq!(updated["priority"], "High");
    assert_eq!(updated["createdAt"], lead["createdAt"]);
}

#[tokio::test]
async fn test_update_validation_and_not_found() {
    let (ctx, token) = ctx_with_token().await;
    let lead = ctx
        .create_lead(&json!({ "name": "Jane", "email": "jane@x.com" }))
        .await;
    let id = lead_id(&lead);

    let invalid = ctx
        .put(&format!("/api/leads/{id}"), &json!({ "status": "Done" }), &token)
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let unchanged = ctx.get(&format!("/api/leads/{id}"), Some(&token)).await;
    assert_eq!(unchanged.body["lead"]["status"], "New");

    let missing = ctx
        .put("/api/leads/4242", &json!({ "status": "Lost" }), &token)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_can_clear_follow_up_date() {
    let (ctx, token) = ctx_with_token().await;
    let lead = ctx
        .create_lead(&json!({
            "name": "Jane",
            "email": "jane@x.com",
            "followUpDate": "2026-12-01T09:00:00Z",
        }))
        .await;
    assert!(lead["followUpDate"].is_string());

    let resp = ctx
        .put(
            &format!("/api/leads/{}", lead_id(&lead)),
            &json!({ "followUpDate": "" }),
            &token,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["lead"]["followUpDate"].is_null());
}

#[tokio::test]
async fn test_update_requires_auth() {
    let ctx = TestContext::new();
    let lead = ctx
        .create_lead(&json!({ "name": "A", "email": "a@x.com" }))
        .await;

    let resp = ctx
        .request(
            axum::http::Method::PUT,
            &format!("/api/leads/{}", lead_id(&lead)),
            Some(&json!({ "status": "Lost" })),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_lead() {
    let (ctx, token) = ctx_with_token().await;
    let lead = ctx
        .create_lead(&json!({ "name": "A", "email": "a@x.com" }))
        .await;
    let uri = format!("/api/leads/{}", lead_id(&lead));

    let resp = ctx.delete(&uri, &token).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);

    assert_eq!(ctx.get(&uri, Some(&token)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.delete(&uri, &token).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_nonexistent_lead() {
    let (ctx, token) = ctx_with_token().await;
    let resp = ctx.delete("/api/leads/12345", &token).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["message"], "Lead not found");
}

// ============================================================================
// Stats
// ============================================================================

#[tokio::test]
async fn test_stats_summary_counts_buckets() {
    let (ctx, token) = ctx_with_token().await;

    let empty = ctx.get("/api/leads/stats/summary", Some(&token)).await;
    assert_eq!(
        empty.body["stats"],
        json!({ "total": 0, "new": 0, "contacted": 0, "converted": 0 })
    );

    for (i, status) in ["New", "New", "Contacted", "Qualified", "Converted", "Lost"]
        .iter()
        .enumerate()
    {
        ctx.create_lead(&json!({
            "name": format!("lead {i}"),
            "email": format!("lead{i}@x.com"),
            "status": status,
        }))
        .await;
    }

    let resp = ctx.get("/api/leads/stats/summary", Some(&token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);
    assert_eq!(
        resp.body["stats"],
        json!({ "total": 6, "new": 2, "contacted": 1, "converted": 1 })
    );
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_readiness_reflects_store() {
    let ctx = TestContext::new();
    assert_eq!(ctx.get("/health/ready", None).await.status, StatusCode::OK);

    ctx.leads.set_available(false);
    assert_eq!(
        ctx.get("/health/ready", None).await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_store_failure_is_generic_server_error() {
    let (ctx, token) = ctx_with_token().await;
    ctx.leads.set_available(false);

    let resp = ctx.get("/api/leads", Some(&token)).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body["success"], false);
    assert_eq!(resp.body["message"], "Server error");
}
