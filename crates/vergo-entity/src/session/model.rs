//! Refresh session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use vergo_core::types::id::{SessionId, UserId};

/// A server-side record backing one refresh token.
///
/// Rows are never deleted; revocation sets `revoked_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Session identifier, embedded in the refresh token.
    pub id: SessionId,
    /// Owner of the session.
    pub user_id: UserId,
    /// Lowercase hex SHA-256 of the raw refresh token.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Set once when the session is revoked or rotated away.
    pub revoked_at: Option<DateTime<Utc>>,
    /// The session this one replaced during rotation.
    pub rotated_from: Option<SessionId>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Whether the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the session authorizes `token_hash` at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, token_hash: &str) -> bool {
        !self.is_revoked() && !self.is_expired_at(now) && self.token_hash == token_hash
    }
}

/// Data required to persist a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// Identifier embedded in the refresh token.
    pub id: SessionId,
    /// Owner.
    pub user_id: UserId,
    /// Hash of the raw refresh token.
    pub token_hash: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Predecessor session when created by rotation.
    pub rotated_from: Option<SessionId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl CreateSession {
    /// Materialize the row this insert would produce.
    pub fn into_session(self) -> Session {
        Session {
            id: self.id,
            user_id: self.user_id,
            token_hash: self.token_hash,
            expires_at: self.expires_at,
            revoked_at: None,
            rotated_from: self.rotated_from,
            created_at: self.created_at,
        }
    }
}
