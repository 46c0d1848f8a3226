//! Audit sink consumed as a fire-and-forget notification channel.

use async_trait::async_trait;
use tracing::warn;

use crate::events::AuditEvent;
use crate::result::AppResult;

/// Destination for audit events.
#[async_trait]
pub trait AuditSink: Send + Sync + 'static {
    /// Persist or forward one event.
    async fn record(&self, event: AuditEvent) -> AppResult<()>;
}

/// Records `event`, logging and swallowing any failure.
pub async fn record_best_effort(sink: &dyn AuditSink, event: AuditEvent) {
    let action = event.action;
    if let Err(e) = sink.record(event).await {
        warn!(action = %action, error = %e, "Failed to record audit event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::events::AuditAction;
    use crate::types::id::UserId;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingSink {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AuditSink for FailingSink {
        async fn record(&self, _event: AuditEvent) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::database("audit store offline"))
        }
    }

    #[tokio::test]
    async fn test_best_effort_swallows_failures() {
        let sink = FailingSink {
            calls: AtomicUsize::new(0),
        };
        let event = AuditEvent::user(Utc::now(), UserId::new(), AuditAction::UserLoggedIn);
        record_best_effort(&sink, event).await;
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }
}
