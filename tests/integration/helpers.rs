//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use vergo_api::{AppState, Backends, build_app};
use vergo_auth::{
    MemoryActiveOrgStore, MemoryAuditSink, MemoryMembershipDirectory, MemorySessionStore,
    MemoryUserStore,
};
use vergo_core::config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig};
use vergo_core::traits::{Clock, SystemClock};
use vergo_core::types::id::{OrgId, UserId};

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Membership directory, seeded by tests
    pub memberships: Arc<MemoryMembershipDirectory>,
    /// Audit events recorded by the app
    pub audit: Arc<MemoryAuditSink>,
}

impl TestApp {
    /// Create a new test application over in-memory backends
    pub fn new() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let memberships = Arc::new(MemoryMembershipDirectory::new());
        let audit = Arc::new(MemoryAuditSink::new());

        let backends = Backends {
            users: Arc::new(MemoryUserStore::new()),
            sessions: Arc::new(MemorySessionStore::new(Arc::clone(&clock))),
            active_orgs: Arc::new(MemoryActiveOrgStore::new()),
            memberships: memberships.clone(),
            audit: audit.clone(),
        };

        let state = AppState::new(test_config(), None, backends, clock)
            .expect("Failed to build app state");

        Self {
            router: build_app(state),
            memberships,
            audit,
        }
    }

    /// Sign up a user and return their ID plus the issued tokens
    pub async fn signup(&self, email: &str, password: &str) -> Session {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self.post("/v1/auth/signup", Some(body), None).await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Signup failed: {:?}",
            response.body
        );
        Session::from_body(&response.body)
    }

    /// Log in and return the issued tokens
    pub async fn login(&self, email: &str, password: &str) -> Session {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self.post("/v1/auth/login", Some(body), None).await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        Session::from_body(&response.body)
    }

    /// Grant `user_id` a role in a fresh organization and return its ID
    pub async fn org_with(&self, user_id: UserId, role: &str) -> OrgId {
        let org_id = OrgId::new();
        self.memberships.grant(org_id, user_id, role).await;
        org_id
    }

    /// POST with a JSON body
    pub async fn post(&self, path: &str, body: Option<Value>, token: Option<&str>) -> TestResponse {
        self.request("POST", path, body, token, None).await
    }

    /// GET with optional bearer token and org selector
    pub async fn get(&self, path: &str, token: Option<&str>, org: Option<&str>) -> TestResponse {
        self.request("GET", path, None, token, org).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        org: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.send(method, path, body_str, token, org).await
    }

    /// Send a raw body, for payloads that are not valid JSON
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: String,
        token: Option<&str>,
        org: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(org) = org {
            req = req.header("X-Org-ID", org);
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Credentials returned by signup, login and refresh
#[derive(Debug, Clone)]
pub struct Session {
    /// Authenticated user, absent after refresh
    pub user_id: Option<UserId>,
    /// Access token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
}

impl Session {
    /// Parse credentials out of an `ApiResponse` body
    pub fn from_body(body: &Value) -> Self {
        let data = &body["data"];
        let user_id = data["user"]["id"]
            .as_str()
            .map(|id| id.parse().expect("Malformed user id"));

        Self {
            user_id,
            access_token: data["access_token"]
                .as_str()
                .expect("No access_token in response")
                .to_string(),
            refresh_token: data["refresh_token"]
                .as_str()
                .expect("No refresh_token in response")
                .to_string(),
        }
    }

    /// The user ID, for sessions created by signup or login
    pub fn user(&self) -> UserId {
        self.user_id.expect("Session has no user")
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Machine-readable error code from an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

fn test_config() -> AppConfig {
    let mut auth = AuthConfig::with_secrets("test-access-secret", "test-refresh-secret");
    auth.argon2_memory_kib = 1024;
    auth.argon2_iterations = 1;

    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
            run_migrations: false,
        },
        auth,
        logging: LoggingConfig::default(),
    }
}
