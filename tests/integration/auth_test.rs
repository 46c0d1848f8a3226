//! Integration tests for signup, login, refresh rotation and logout.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_signup_returns_user_and_tokens() {
    let app = TestApp::new();

    let body = json!({ "email": "Alice@Example.COM", "password": "hunter22" });
    let response = app.post("/v1/auth/signup", Some(body), None).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["user"]["email"], "alice@example.com");
    assert!(response.body["data"]["user"].get("password_hash").is_none());
    assert!(response.body["data"]["access_token"].is_string());
    assert!(response.body["data"]["refresh_expires_at"].is_string());
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let app = TestApp::new();
    app.signup("bob@example.com", "password1").await;

    let body = json!({ "email": "BOB@example.com", "password": "password2" });
    let response = app.post("/v1/auth/signup", Some(body), None).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "email_in_use");
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let app = TestApp::new();

    let body = json!({ "email": "carol@example.com", "password": "abc" });
    let response = app.post("/v1/auth/signup", Some(body), None).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code(), "invalid_payload");
}

#[tokio::test]
async fn test_malformed_json_is_invalid_payload() {
    let app = TestApp::new();

    let response = app
        .send("POST", "/v1/auth/login", "{not json".to_string(), None, None)
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code(), "invalid_payload");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.signup("dave@example.com", "correct-horse").await;

    let wrong_password = app
        .post(
            "/v1/auth/login",
            Some(json!({ "email": "dave@example.com", "password": "wrong-horse" })),
            None,
        )
        .await;
    let unknown_email = app
        .post(
            "/v1/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": "wrong-horse" })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.error_code(), "invalid_credentials");
}

#[tokio::test]
async fn test_refresh_rotates_and_old_token_dies() {
    let app = TestApp::new();
    let signup = app.signup("erin@example.com", "password1").await;
    let login = app.login("erin@example.com", "password1").await;
    assert_eq!(signup.user(), login.user());

    let response = app
        .post(
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": login.refresh_token })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let rotated = helpers::Session::from_body(&response.body);
    assert_ne!(rotated.refresh_token, login.refresh_token);

    let replay = app
        .post(
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": login.refresh_token })),
            None,
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.error_code(), "invalid_session");

    let me = app.get("/v1/me", Some(&rotated.access_token), None).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new();
    let session = app.signup("frank@example.com", "password1").await;

    let response = app
        .post(
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": session.access_token })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "invalid_token");
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = TestApp::new();
    let session = app.signup("grace@example.com", "password1").await;

    let logout = app
        .post(
            "/v1/auth/logout",
            Some(json!({ "refresh_token": session.refresh_token })),
            None,
        )
        .await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);

    let refresh = app
        .post(
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": session.refresh_token })),
            None,
        )
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
    assert_eq!(refresh.error_code(), "invalid_session");
}

#[tokio::test]
async fn test_logout_accepts_garbage_token() {
    let app = TestApp::new();

    let response = app
        .post(
            "/v1/auth/logout",
            Some(json!({ "refresh_token": "definitely.not.a.jwt" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let app = TestApp::new();
    let first = app.signup("heidi@example.com", "password1").await;
    let second = app.login("heidi@example.com", "password1").await;

    let rotated = app
        .post(
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": second.refresh_token })),
            None,
        )
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    let newest = helpers::Session::from_body(&rotated.body);

    let response = app
        .post("/v1/auth/logout-all", None, Some(&first.access_token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    for token in [&first.refresh_token, &newest.refresh_token] {
        let refresh = app
            .post(
                "/v1/auth/refresh",
                Some(json!({ "refresh_token": token })),
                None,
            )
            .await;
        assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_logout_all_requires_bearer() {
    let app = TestApp::new();

    let response = app.post("/v1/auth/logout-all", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "missing_bearer");
}

#[tokio::test]
async fn test_me_rejects_refresh_token_as_bearer() {
    let app = TestApp::new();
    let session = app.signup("ivan@example.com", "password1").await;

    let response = app.get("/v1/me", Some(&session.refresh_token), None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "invalid_token");
}

#[tokio::test]
async fn test_auth_flows_are_audited() {
    let app = TestApp::new();
    let session = app.signup("judy@example.com", "password1").await;
    app.post(
        "/v1/auth/refresh",
        Some(json!({ "refresh_token": session.refresh_token })),
        None,
    )
    .await;

    let actions: Vec<&str> = app
        .audit
        .events()
        .await
        .iter()
        .map(|e| e.action.as_str())
        .collect();
    assert_eq!(actions, vec!["auth.signup", "auth.refresh"]);
}

#[tokio::test]
async fn test_health_probes() {
    let app = TestApp::new();

    let health = app.get("/healthz", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");

    let ready = app.get("/readyz", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body["database"], "disabled");
}

#[tokio::test]
async fn test_reserved_routes_not_implemented() {
    let app = TestApp::new();

    let response = app.post("/v1/auth/forgot-password", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(response.error_code(), "not_implemented");
}
