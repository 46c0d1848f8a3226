//! Active organization persistence.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use vergo_core::result::AppResult;
use vergo_core::traits::Clock;
use vergo_core::types::id::{OrgId, UserId};
use vergo_database::repositories::ActiveOrgRepository;

/// Stores at most one active organization per user.
#[async_trait]
pub trait ActiveOrgStore: Send + Sync + 'static {
    /// The user's active organization, if any.
    async fn get(&self, user_id: UserId) -> AppResult<Option<OrgId>>;

    /// Overwrite the user's active organization.
    async fn set(&self, user_id: UserId, org_id: OrgId) -> AppResult<()>;
}

/// PostgreSQL-backed active organization store.
#[derive(Clone)]
pub struct PgActiveOrgStore {
    repo: ActiveOrgRepository,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PgActiveOrgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgActiveOrgStore").finish()
    }
}

impl PgActiveOrgStore {
    /// Creates a new store over the active-org repository.
    pub fn new(repo: ActiveOrgRepository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl ActiveOrgStore for PgActiveOrgStore {
    async fn get(&self, user_id: UserId) -> AppResult<Option<OrgId>> {
        Ok(self.repo.find(user_id).await?.map(|row| row.org_id))
    }

    async fn set(&self, user_id: UserId, org_id: OrgId) -> AppResult<()> {
        self.repo.upsert(user_id, org_id, self.clock.now()).await
    }
}

/// In-memory active organization store.
#[derive(Debug, Clone, Default)]
pub struct MemoryActiveOrgStore {
    entries: Arc<Mutex<HashMap<UserId, OrgId>>>,
}

impl MemoryActiveOrgStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActiveOrgStore for MemoryActiveOrgStore {
    async fn get(&self, user_id: UserId) -> AppResult<Option<OrgId>> {
        Ok(self.entries.lock().await.get(&user_id).copied())
    }

    async fn set(&self, user_id: UserId, org_id: OrgId) -> AppResult<()> {
        self.entries.lock().await.insert(user_id, org_id);
        Ok(())
    }
}
