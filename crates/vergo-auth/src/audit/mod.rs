//! Audit sinks.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use vergo_core::events::AuditEvent;
use vergo_core::result::AppResult;
use vergo_core::traits::AuditSink;
use vergo_database::repositories::AuditLogRepository;

/// Emits each event as a structured `info` log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            target: "audit",
            action = %event.action,
            actor_id = ?event.actor_id.map(|id| id.to_string()),
            org_id = ?event.org_id.map(|id| id.to_string()),
            entity = %event.entity,
            entity_id = ?event.entity_id,
            "Audit event"
        );
        Ok(())
    }
}

/// Appends events to the `audit_log` table.
#[derive(Debug, Clone)]
pub struct PgAuditSink {
    repo: AuditLogRepository,
}

impl PgAuditSink {
    /// Creates a new sink over the audit log repository.
    pub fn new(repo: AuditLogRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.repo.insert(&event).await
    }
}

/// Keeps events in memory for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, oldest first.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}
