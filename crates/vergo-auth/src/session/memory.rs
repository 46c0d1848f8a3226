//! In-memory session store for single-node deployments and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use vergo_core::result::AppResult;
use vergo_core::traits::Clock;
use vergo_core::types::id::{SessionId, UserId};
use vergo_entity::session::Session;

use super::hash::hash_token;
use super::store::{NewSession, SessionInfo, SessionStore};

/// Session store keeping every row in a mutex-guarded map.
///
/// Rotation runs inside one critical section, so concurrent rotations of the
/// same session cannot both succeed.
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySessionStore").finish()
    }
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Returns a copy of a stored row, live or not.
    pub async fn get(&self, id: SessionId) -> Option<Session> {
        self.sessions.lock().await.get(&id).cloned()
    }

    /// Number of stored rows, revoked ones included.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: NewSession) -> AppResult<()> {
        let row = session.into_create(self.clock.now()).into_session();
        self.sessions.lock().await.insert(row.id, row);
        Ok(())
    }

    async fn validate(&self, id: SessionId, raw_token: &str) -> AppResult<Option<SessionInfo>> {
        let now = self.clock.now();
        let hash = hash_token(raw_token);
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .get(&id)
            .filter(|s| s.is_valid_at(now, &hash))
            .map(|s| SessionInfo {
                user_id: s.user_id,
                expires_at: s.expires_at,
            }))
    }

    async fn revoke(&self, id: SessionId) -> AppResult<()> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&id) {
            session.revoked_at.get_or_insert(now);
        }
        Ok(())
    }

    async fn revoke_all(&self, user_id: UserId) -> AppResult<()> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;
        for session in sessions.values_mut().filter(|s| s.user_id == user_id) {
            session.revoked_at.get_or_insert(now);
        }
        Ok(())
    }

    async fn rotate(
        &self,
        old_id: SessionId,
        old_raw_token: &str,
        next: NewSession,
    ) -> AppResult<bool> {
        let now = self.clock.now();
        let hash = hash_token(old_raw_token);
        let mut sessions = self.sessions.lock().await;

        match sessions.get_mut(&old_id) {
            Some(old) if old.is_valid_at(now, &hash) => old.revoked_at = Some(now),
            _ => return Ok(false),
        }

        let row = next.into_create(now).into_session();
        sessions.insert(row.id, row);
        Ok(true)
    }
}
