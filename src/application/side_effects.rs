//! Best-effort follow-up work after a primary write.
//!
//! Notification emails and audit records never fail the command that
//! triggered them; failures are logged and dropped.

use crate::domain::audit::AuditEntry;
use crate::domain::email::{EmailMessage, QueuedEmail};
use crate::domain::foundation::ValidationError;
use crate::ports::{AuditLog, EmailQueue};

/// Queues a rendered notification. Returns whether it was queued.
pub(crate) async fn queue_email(
    queue: &dyn EmailQueue,
    message: Result<EmailMessage, ValidationError>,
) -> bool {
    let message = match message {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping notification with invalid content");
            return false;
        }
    };
    let template = message.template.clone().unwrap_or_default();
    match queue.enqueue(&QueuedEmail::enqueue(message, None)).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, template = %template, "Failed to queue notification email");
            false
        }
    }
}

pub(crate) async fn record_audit(log: &dyn AuditLog, entry: AuditEntry) {
    if let Err(e) = log.record(&entry).await {
        tracing::warn!(
            error = %e,
            action = %entry.action,
            entity_id = %entry.entity_id,
            "Failed to write audit record"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::audit::AuditAction;
    use crate::domain::foundation::UserId;
    use serde_json::json;

    #[tokio::test]
    async fn invalid_message_is_not_queued() {
        let store = InMemoryStore::new();
        let queued = queue_email(&store, EmailMessage::new("not-an-address", "Hi", "<p>x</p>")).await;
        assert!(!queued);
        assert!(store.queued_emails().await.is_empty());
    }

    #[tokio::test]
    async fn valid_message_is_queued_pending() {
        let store = InMemoryStore::new();
        let queued =
            queue_email(&store, EmailMessage::new("judge@example.com", "Hi", "<p>x</p>")).await;
        assert!(queued);
        assert_eq!(store.queued_emails().await.len(), 1);
    }

    #[tokio::test]
    async fn audit_is_recorded() {
        let store = InMemoryStore::new();
        record_audit(
            &store,
            AuditEntry::record(
                UserId::new("admin").unwrap(),
                AuditAction::EventApproved,
                "event",
                "e-1",
                json!({}),
            ),
        )
        .await;
        assert_eq!(store.audit_entries().await.len(), 1);
    }
}
