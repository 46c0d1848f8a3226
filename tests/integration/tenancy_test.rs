//! Integration tests for tenant resolution, membership checks and roles.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;
use vergo_core::types::id::OrgId;

#[tokio::test]
async fn test_tenant_route_requires_bearer() {
    let app = TestApp::new();

    let response = app.get("/v1/orgs/current", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "missing_bearer");
}

#[tokio::test]
async fn test_missing_org_without_active_org() {
    let app = TestApp::new();
    let session = app.signup("alice@example.com", "password1").await;

    let response = app
        .get("/v1/orgs/current", Some(&session.access_token), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "missing_org_id");
}

#[tokio::test]
async fn test_malformed_org_header() {
    let app = TestApp::new();
    let session = app.signup("bob@example.com", "password1").await;

    let response = app
        .get(
            "/v1/orgs/current",
            Some(&session.access_token),
            Some("not-a-uuid"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code(), "invalid_payload");
}

#[tokio::test]
async fn test_non_member_forbidden() {
    let app = TestApp::new();
    let session = app.signup("carol@example.com", "password1").await;
    let stranger_org = OrgId::new().to_string();

    let response = app
        .get(
            "/v1/orgs/current",
            Some(&session.access_token),
            Some(&stranger_org),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "not_a_member");
}

#[tokio::test]
async fn test_member_sees_current_org() {
    let app = TestApp::new();
    let session = app.signup("dave@example.com", "password1").await;
    let org_id = app.org_with(session.user(), "member").await;

    let response = app
        .get(
            "/v1/orgs/current",
            Some(&session.access_token),
            Some(&org_id.to_string()),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["org_id"], org_id.to_string());
    assert_eq!(response.body["data"]["role"], "member");
}

#[tokio::test]
async fn test_member_denied_admin_route() {
    let app = TestApp::new();
    let session = app.signup("erin@example.com", "password1").await;
    let org_id = app.org_with(session.user(), "member").await;

    let response = app
        .get(
            "/v1/orgs/current/members",
            Some(&session.access_token),
            Some(&org_id.to_string()),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "insufficient_role");
}

#[tokio::test]
async fn test_owner_passes_admin_threshold() {
    let app = TestApp::new();
    let session = app.signup("frank@example.com", "password1").await;
    let org_id = app.org_with(session.user(), "owner").await;

    let response = app
        .get("/v1/audit", Some(&session.access_token), Some(&org_id.to_string()))
        .await;

    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_unknown_role_never_authorizes() {
    let app = TestApp::new();
    let session = app.signup("grace@example.com", "password1").await;
    let org_id = app.org_with(session.user(), "superuser").await;
    let org = org_id.to_string();

    let current = app
        .get("/v1/orgs/current", Some(&session.access_token), Some(&org))
        .await;
    assert_eq!(current.status, StatusCode::FORBIDDEN);
    assert_eq!(current.error_code(), "insufficient_role");
}

#[tokio::test]
async fn test_context_round_trip_and_fallback() {
    let app = TestApp::new();
    let session = app.signup("heidi@example.com", "password1").await;
    let token = session.access_token.as_str();
    let org_id = app.org_with(session.user(), "admin").await;

    let empty = app.get("/v1/context", Some(token), None).await;
    assert_eq!(empty.status, StatusCode::NO_CONTENT);

    let set = app
        .post("/v1/context", Some(json!({ "org_id": org_id })), Some(token))
        .await;
    assert_eq!(set.status, StatusCode::NO_CONTENT);

    let stored = app.get("/v1/context", Some(token), None).await;
    assert_eq!(stored.status, StatusCode::OK);
    assert_eq!(stored.body["data"]["org_id"], org_id.to_string());
    assert_eq!(stored.body["data"]["role"], "admin");

    // No header: the persisted active organization is used.
    let current = app.get("/v1/orgs/current", Some(token), None).await;
    assert_eq!(current.status, StatusCode::OK);
    assert_eq!(current.body["data"]["role"], "admin");

    let actions: Vec<&str> = app
        .audit
        .events()
        .await
        .iter()
        .map(|e| e.action.as_str())
        .collect();
    assert!(actions.contains(&"context.set"));
}

#[tokio::test]
async fn test_header_overrides_active_org() {
    let app = TestApp::new();
    let session = app.signup("ivan@example.com", "password1").await;
    let token = session.access_token.as_str();
    let home = app.org_with(session.user(), "owner").await;
    let other = app.org_with(session.user(), "member").await;

    app.post("/v1/context", Some(json!({ "org_id": home })), Some(token))
        .await;

    let response = app
        .get("/v1/orgs/current", Some(token), Some(&other.to_string()))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["org_id"], other.to_string());
    assert_eq!(response.body["data"]["role"], "member");
}

#[tokio::test]
async fn test_context_rejects_non_member() {
    let app = TestApp::new();
    let session = app.signup("judy@example.com", "password1").await;

    let response = app
        .post(
            "/v1/context",
            Some(json!({ "org_id": OrgId::new() })),
            Some(&session.access_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "not_a_member");

    let stored = app
        .get("/v1/context", Some(&session.access_token), None)
        .await;
    assert_eq!(stored.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_revoked_membership_takes_effect_immediately() {
    let app = TestApp::new();
    let session = app.signup("mallory@example.com", "password1").await;
    let org_id = app.org_with(session.user(), "admin").await;
    let org = org_id.to_string();

    let before = app
        .get("/v1/orgs/current", Some(&session.access_token), Some(&org))
        .await;
    assert_eq!(before.status, StatusCode::OK);

    app.memberships.remove(org_id, session.user()).await;

    let after = app
        .get("/v1/orgs/current", Some(&session.access_token), Some(&org))
        .await;
    assert_eq!(after.status, StatusCode::FORBIDDEN);
    assert_eq!(after.error_code(), "not_a_member");
}

#[tokio::test]
async fn test_context_survives_lapsed_membership() {
    let app = TestApp::new();
    let session = app.signup("olivia@example.com", "password1").await;
    let token = session.access_token.as_str();
    let org_id = app.org_with(session.user(), "member").await;

    app.post("/v1/context", Some(json!({ "org_id": org_id })), Some(token))
        .await;
    app.memberships.remove(org_id, session.user()).await;

    let stored = app.get("/v1/context", Some(token), None).await;
    assert_eq!(stored.status, StatusCode::OK);
    assert_eq!(stored.body["data"]["org_id"], org_id.to_string());
    assert!(stored.body["data"]["role"].is_null());
}

#[tokio::test]
async fn test_me_includes_org_for_members_only() {
    let app = TestApp::new();
    let session = app.signup("niaj@example.com", "password1").await;
    let token = session.access_token.as_str();
    let org_id = app.org_with(session.user(), "member").await;

    let plain = app.get("/v1/me", Some(token), None).await;
    assert_eq!(plain.status, StatusCode::OK);
    assert_eq!(plain.body["data"]["user"]["email"], "niaj@example.com");
    assert!(plain.body["data"].get("org").is_none());

    let scoped = app.get("/v1/me", Some(token), Some(&org_id.to_string())).await;
    assert_eq!(scoped.status, StatusCode::OK);
    assert_eq!(scoped.body["data"]["org"]["org_id"], org_id.to_string());
    assert_eq!(scoped.body["data"]["org"]["role"], "member");

    let stranger = OrgId::new().to_string();
    let outsider = app.get("/v1/me", Some(token), Some(&stranger)).await;
    assert_eq!(outsider.status, StatusCode::OK);
    assert!(outsider.body["data"].get("org").is_none());
}

#[tokio::test]
async fn test_unknown_route_is_not_found_without_auth() {
    let app = TestApp::new();

    let response = app.get("/v1/nope", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
