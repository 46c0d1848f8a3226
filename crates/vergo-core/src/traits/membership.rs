//! Membership lookup capability consumed from the organization collaborator.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::{OrgId, UserId};

/// Answers "is this user a member of this organization, and with which role?".
///
/// The role comes back as the collaborator's raw string; callers are
/// responsible for mapping it onto the closed role set.
#[async_trait]
pub trait MembershipLookup: Send + Sync + 'static {
    /// Returns `Some(role)` for a member and `None` otherwise.
    async fn is_member(&self, org_id: &OrgId, user_id: &UserId) -> AppResult<Option<String>>;
}
