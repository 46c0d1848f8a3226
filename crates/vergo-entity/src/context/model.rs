//! Persisted active-organization selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use vergo_core::types::id::{OrgId, UserId};

/// The organization a user last selected. At most one row per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActiveOrg {
    /// The user.
    pub user_id: UserId,
    /// The selected organization.
    pub org_id: OrgId,
    /// When the selection was last written.
    pub updated_at: DateTime<Utc>,
}
