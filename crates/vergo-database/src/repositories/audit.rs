//! Audit log repository implementation.

use sqlx::PgPool;

use vergo_core::error::{AppError, ErrorKind};
use vergo_core::events::AuditEvent;
use vergo_core::result::AppResult;

/// Append-only repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one event.
    pub async fn insert(&self, event: &AuditEvent) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO audit_log (id, org_id, actor_id, action, entity, entity_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(event.id)
        .bind(event.org_id)
        .bind(event.actor_id)
        .bind(event.action.as_str())
        .bind(&event.entity)
        .bind(event.entity_id.as_deref())
        .bind(event.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write audit entry", e))?;
        Ok(())
    }
}
