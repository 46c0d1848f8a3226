//! Read-only membership lookups.

use sqlx::PgPool;

use vergo_core::error::{AppError, ErrorKind};
use vergo_core::result::AppResult;
use vergo_core::types::id::{OrgId, UserId};
use vergo_entity::membership::Membership;

/// Repository for organization membership rows.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the membership of `user_id` in `org_id`.
    pub async fn find(&self, org_id: OrgId, user_id: UserId) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT org_id, user_id, role FROM memberships WHERE org_id = $1 AND user_id = $2",
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }
}
