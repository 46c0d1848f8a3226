//! Audit events for authentication and tenancy operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::types::id::{OrgId, SessionId, UserId};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A new account was registered.
    UserSignedUp,
    /// A user authenticated with email and password.
    UserLoggedIn,
    /// A refresh session was exchanged for a new one.
    SessionRotated,
    /// A single refresh session was revoked.
    SessionRevoked,
    /// Every refresh session of a user was revoked.
    AllSessionsRevoked,
    /// A user switched their persisted active organization.
    ActiveOrgChanged,
}

impl AuditAction {
    /// Return the action as a dotted string, as stored in the audit log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserSignedUp => "auth.signup",
            Self::UserLoggedIn => "auth.login",
            Self::SessionRotated => "auth.refresh",
            Self::SessionRevoked => "auth.logout",
            Self::AllSessionsRevoked => "auth.logout_all",
            Self::ActiveOrgChanged => "context.set",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Organization scope, when the action is tenant-bound.
    pub org_id: Option<OrgId>,
    /// The user who caused the event.
    pub actor_id: Option<UserId>,
    /// The action performed.
    pub action: AuditAction,
    /// Entity type the action touched (`"user"`, `"session"`, `"org"`).
    pub entity: String,
    /// Identifier of the touched entity.
    pub entity_id: Option<String>,
}

impl AuditEvent {
    /// Create a new event stamped at `timestamp`.
    pub fn new(
        timestamp: DateTime<Utc>,
        actor_id: Option<UserId>,
        action: AuditAction,
        entity: impl Into<String>,
        entity_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            org_id: None,
            actor_id,
            action,
            entity: entity.into(),
            entity_id,
        }
    }

    /// Event about a user account.
    pub fn user(timestamp: DateTime<Utc>, user_id: UserId, action: AuditAction) -> Self {
        Self::new(
            timestamp,
            Some(user_id),
            action,
            "user",
            Some(user_id.to_string()),
        )
    }

    /// Event about a refresh session.
    pub fn session(
        timestamp: DateTime<Utc>,
        user_id: UserId,
        session_id: SessionId,
        action: AuditAction,
    ) -> Self {
        Self::new(
            timestamp,
            Some(user_id),
            action,
            "session",
            Some(session_id.to_string()),
        )
    }

    /// Attach an organization scope.
    pub fn in_org(mut self, org_id: OrgId) -> Self {
        self.org_id = Some(org_id);
        self
    }
}
