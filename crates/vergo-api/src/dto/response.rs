//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vergo_auth::TokenPair;
use vergo_core::types::id::{OrgId, UserId};
use vergo_entity::membership::OrgRole;
use vergo_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: UserId,
    /// Normalized email.
    pub email: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Credential pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            access_expires_at: pair.access_expires_at,
            refresh_expires_at: pair.refresh_expires_at,
        }
    }
}

/// Signup and login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: UserResponse,
    /// Issued credentials.
    #[serde(flatten)]
    pub tokens: TokenResponse,
}

/// Organization binding as seen by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgScopeResponse {
    /// Organization ID.
    pub org_id: OrgId,
    /// Role in the organization, absent when unrecognized.
    pub role: Option<OrgRole>,
}

/// `GET /v1/me` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// The caller.
    pub user: UserResponse,
    /// Present when `X-Org-ID` names an organization the caller belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<OrgScopeResponse>,
}

/// `GET /v1/context` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextResponse {
    /// Persisted active organization.
    pub org_id: OrgId,
    /// Caller's role there; absent when no longer a member or unrecognized.
    pub role: Option<OrgRole>,
}

/// `GET /v1/orgs/current` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentOrgResponse {
    /// The caller.
    pub user_id: UserId,
    /// Bound organization.
    pub org_id: OrgId,
    /// Bound role.
    pub role: Option<OrgRole>,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// "ready" or "unavailable".
    pub status: String,
    /// "connected", "unreachable" or "disabled".
    pub database: String,
}
