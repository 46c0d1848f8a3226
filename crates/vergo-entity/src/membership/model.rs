//! Membership row as exposed by the organization store.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use vergo_core::types::id::{OrgId, UserId};

use super::role::OrgRole;

/// A user's membership in one organization.
///
/// `role` is kept as the raw stored string so that unrecognized values
/// can be carried without failing the row decode.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    /// The organization.
    pub org_id: OrgId,
    /// The member.
    pub user_id: UserId,
    /// Raw role string.
    pub role: String,
}

impl Membership {
    /// The recognized role, or `None` for an unknown string.
    pub fn org_role(&self) -> Option<OrgRole> {
        self.role.parse().ok()
    }
}
