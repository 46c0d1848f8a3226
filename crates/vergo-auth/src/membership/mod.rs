//! Membership lookup adapters.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use vergo_core::result::AppResult;
use vergo_core::traits::MembershipLookup;
use vergo_core::types::id::{OrgId, UserId};
use vergo_database::repositories::MembershipRepository;

/// Membership lookup over the `memberships` table.
#[derive(Debug, Clone)]
pub struct PgMembershipLookup {
    repo: MembershipRepository,
}

impl PgMembershipLookup {
    /// Creates a new lookup over the membership repository.
    pub fn new(repo: MembershipRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl MembershipLookup for PgMembershipLookup {
    async fn is_member(&self, org_id: &OrgId, user_id: &UserId) -> AppResult<Option<String>> {
        Ok(self.repo.find(*org_id, *user_id).await?.map(|m| m.role))
    }
}

/// In-memory membership directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryMembershipDirectory {
    roles: Arc<RwLock<HashMap<(OrgId, UserId), String>>>,
}

impl MemoryMembershipDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `user_id` the raw `role` in `org_id`, replacing any previous role.
    pub async fn grant(&self, org_id: OrgId, user_id: UserId, role: impl Into<String>) {
        self.roles
            .write()
            .await
            .insert((org_id, user_id), role.into());
    }

    /// Removes a membership.
    pub async fn remove(&self, org_id: OrgId, user_id: UserId) {
        self.roles.write().await.remove(&(org_id, user_id));
    }
}

#[async_trait]
impl MembershipLookup for MemoryMembershipDirectory {
    async fn is_member(&self, org_id: &OrgId, user_id: &UserId) -> AppResult<Option<String>> {
        Ok(self.roles.read().await.get(&(*org_id, *user_id)).cloned())
    }
}
