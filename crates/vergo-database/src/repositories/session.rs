//! Refresh session repository implementation.
//!
//! Every mutation is a conditional `UPDATE ... WHERE revoked_at IS NULL`, so
//! revocation is one-way and idempotent. Rows are never deleted.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use vergo_core::error::{AppError, ErrorKind};
use vergo_core::result::AppResult;
use vergo_core::types::id::{SessionId, UserId};
use vergo_entity::session::{CreateSession, Session};

/// Repository for refresh session rows.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by ID regardless of state.
    pub async fn find_by_id(&self, id: SessionId) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT id, user_id, token_hash, expires_at, revoked_at, rotated_from, created_at \
             FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Insert a new session.
    pub async fn create(&self, data: &CreateSession) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, token_hash, expires_at, rotated_from, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(&data.token_hash)
        .bind(data.expires_at)
        .bind(data.rotated_from)
        .bind(data.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))?;
        Ok(())
    }

    /// Revoke a single session. No-op when already revoked or absent.
    pub async fn revoke(&self, id: SessionId, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = $2 WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke session", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every live session of a user. Returns the number revoked.
    pub async fn revoke_all_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = $2 WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user sessions", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Revoke `old_id` and insert `next` in one transaction.
    ///
    /// The revoke only matches a session that is still live for `old_hash` at
    /// `now`. When it matches nothing the transaction is rolled back and
    /// `false` is returned.
    pub async fn rotate(
        &self,
        old_id: SessionId,
        old_hash: &str,
        next: &CreateSession,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin rotation", e)
        })?;

        // Step 1: conditional revoke of the predecessor
        let revoked = sqlx::query_scalar::<_, SessionId>(
            "UPDATE sessions SET revoked_at = $3 \
             WHERE id = $1 AND token_hash = $2 AND revoked_at IS NULL AND expires_at > $3 \
             RETURNING id",
        )
        .bind(old_id)
        .bind(old_hash)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke rotated session", e)
        })?;

        if revoked.is_none() {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back rotation", e)
            })?;
            return Ok(false);
        }

        // Step 2: insert the successor
        sqlx::query(
            "INSERT INTO sessions (id, user_id, token_hash, expires_at, rotated_from, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(next.id)
        .bind(next.user_id)
        .bind(&next.token_hash)
        .bind(next.expires_at)
        .bind(next.rotated_from)
        .bind(next.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert rotated session", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit rotation", e)
        })?;
        Ok(true)
    }
}
