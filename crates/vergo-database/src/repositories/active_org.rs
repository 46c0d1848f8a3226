//! Persisted active organization per user.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use vergo_core::error::{AppError, ErrorKind};
use vergo_core::result::AppResult;
use vergo_core::types::id::{OrgId, UserId};
use vergo_entity::context::ActiveOrg;

/// Repository for the `active_org` table.
#[derive(Debug, Clone)]
pub struct ActiveOrgRepository {
    pool: PgPool,
}

impl ActiveOrgRepository {
    /// Create a new active-org repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the active organization of a user.
    pub async fn find(&self, user_id: UserId) -> AppResult<Option<ActiveOrg>> {
        sqlx::query_as::<_, ActiveOrg>(
            "SELECT user_id, org_id, updated_at FROM active_org WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find active org", e))
    }

    /// Insert or overwrite the active organization of a user.
    pub async fn upsert(&self, user_id: UserId, org_id: OrgId, now: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO active_org (user_id, org_id, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO UPDATE SET org_id = EXCLUDED.org_id, updated_at = EXCLUDED.updated_at",
        )
        .bind(user_id)
        .bind(org_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set active org", e))?;
        Ok(())
    }
}
