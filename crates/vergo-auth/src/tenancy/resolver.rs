//! Tenancy resolver over an [`ActiveOrgStore`].

use std::sync::Arc;

use tracing::info;

use vergo_core::result::AppResult;
use vergo_core::types::id::{OrgId, UserId};

use super::store::ActiveOrgStore;

/// Reads and writes the implicit tenant of each user.
///
/// Performs no membership check; callers that accept user input go through
/// [`AuthorizationGate::select_active_org`](crate::gate::AuthorizationGate::select_active_org).
#[derive(Clone)]
pub struct TenancyResolver {
    store: Arc<dyn ActiveOrgStore>,
}

impl std::fmt::Debug for TenancyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenancyResolver").finish()
    }
}

impl TenancyResolver {
    /// Creates a new resolver.
    pub fn new(store: Arc<dyn ActiveOrgStore>) -> Self {
        Self { store }
    }

    /// The user's persisted active organization.
    pub async fn get_active_org(&self, user_id: UserId) -> AppResult<Option<OrgId>> {
        self.store.get(user_id).await
    }

    /// Upserts the user's active organization.
    pub async fn set_active_org(&self, user_id: UserId, org_id: OrgId) -> AppResult<()> {
        self.store.set(user_id, org_id).await?;
        info!(user_id = %user_id, org_id = %org_id, "Active organization set");
        Ok(())
    }
}
