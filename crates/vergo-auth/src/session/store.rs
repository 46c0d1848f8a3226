//! Refresh session store trait and its PostgreSQL implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use vergo_core::result::AppResult;
use vergo_core::traits::Clock;
use vergo_core::types::id::{SessionId, UserId};
use vergo_database::repositories::SessionRepository;
use vergo_entity::session::CreateSession;

use super::hash::hash_token;

/// A session about to be persisted. Carries the raw token; stores keep only
/// its hash.
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Session ID from the refresh token's `sid` claim.
    pub id: SessionId,
    /// Owner.
    pub user_id: UserId,
    /// The raw refresh token.
    pub raw_token: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Predecessor when created by rotation.
    pub rotated_from: Option<SessionId>,
}

impl NewSession {
    pub(crate) fn into_create(self, now: DateTime<Utc>) -> CreateSession {
        CreateSession {
            id: self.id,
            user_id: self.user_id,
            token_hash: hash_token(&self.raw_token),
            expires_at: self.expires_at,
            rotated_from: self.rotated_from,
            created_at: now,
        }
    }
}

/// What a successful validation reveals about a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    /// Owner.
    pub user_id: UserId,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

/// Durable record of issued refresh sessions.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist a new session.
    async fn save(&self, session: NewSession) -> AppResult<()>;

    /// Look up a live session for `raw_token`.
    ///
    /// Absence, revocation, expiry and hash mismatch all yield `None`.
    async fn validate(&self, id: SessionId, raw_token: &str) -> AppResult<Option<SessionInfo>>;

    /// Revoke one session. Succeeds for revoked or unknown sessions.
    async fn revoke(&self, id: SessionId) -> AppResult<()>;

    /// Revoke every live session of a user.
    async fn revoke_all(&self, user_id: UserId) -> AppResult<()>;

    /// Atomically revoke `old_id` (only if still live for `old_raw_token`)
    /// and save `next`. Returns `false`, writing nothing, when the old
    /// session was no longer live.
    async fn rotate(
        &self,
        old_id: SessionId,
        old_raw_token: &str,
        next: NewSession,
    ) -> AppResult<bool>;
}

/// PostgreSQL-backed session store.
#[derive(Clone)]
pub struct PgSessionStore {
    repo: SessionRepository,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PgSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgSessionStore").finish()
    }
}

impl PgSessionStore {
    /// Creates a new store over the session repository.
    pub fn new(repo: SessionRepository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn save(&self, session: NewSession) -> AppResult<()> {
        let data = session.into_create(self.clock.now());
        self.repo.create(&data).await
    }

    async fn validate(&self, id: SessionId, raw_token: &str) -> AppResult<Option<SessionInfo>> {
        let now = self.clock.now();
        let hash = hash_token(raw_token);
        Ok(self
            .repo
            .find_by_id(id)
            .await?
            .filter(|s| s.is_valid_at(now, &hash))
            .map(|s| SessionInfo {
                user_id: s.user_id,
                expires_at: s.expires_at,
            }))
    }

    async fn revoke(&self, id: SessionId) -> AppResult<()> {
        self.repo.revoke(id, self.clock.now()).await?;
        Ok(())
    }

    async fn revoke_all(&self, user_id: UserId) -> AppResult<()> {
        self.repo.revoke_all_for_user(user_id, self.clock.now()).await?;
        Ok(())
    }

    async fn rotate(
        &self,
        old_id: SessionId,
        old_raw_token: &str,
        next: NewSession,
    ) -> AppResult<bool> {
        let now = self.clock.now();
        let data = next.into_create(now);
        self.repo
            .rotate(old_id, &hash_token(old_raw_token), &data, now)
            .await
    }
}
