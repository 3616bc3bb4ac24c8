//! Terminal event transitions: cancel and complete.

use std::sync::Arc;

use serde_json::json;

use super::query_events::{event_not_found, load_managed_event};
use crate::application::side_effects::record_audit;
use crate::application::Actor;
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::event::Event;
use crate::domain::foundation::{DomainError, EventId};
use crate::ports::{AuditLog, EventRepository};

#[derive(Debug, Clone)]
pub struct CancelEventCommand {
    pub actor: Actor,
    pub event_id: EventId,
}

/// Handler for cancelling an event (organizer or admin).
pub struct CancelEventHandler {
    events: Arc<dyn EventRepository>,
    audit: Arc<dyn AuditLog>,
}

impl CancelEventHandler {
    pub fn new(events: Arc<dyn EventRepository>, audit: Arc<dyn AuditLog>) -> Self {
        Self { events, audit }
    }

    pub async fn handle(&self, cmd: CancelEventCommand) -> Result<Event, DomainError> {
        let mut event = load_managed_event(self.events.as_ref(), &cmd.actor, &cmd.event_id).await?;
        let previous = event.status;
        event.cancel()?;
        self.events.update(&event).await?;

        record_audit(
            self.audit.as_ref(),
            AuditEntry::record(
                cmd.actor.user_id,
                AuditAction::EventCancelled,
                "event",
                event.id,
                json!({ "previous_status": previous.as_str() }),
            ),
        )
        .await;
        Ok(event)
    }
}

#[derive(Debug, Clone)]
pub struct CompleteEventCommand {
    pub actor: Actor,
    pub event_id: EventId,
}

/// Handler for marking a published event as completed (admin only).
pub struct CompleteEventHandler {
    events: Arc<dyn EventRepository>,
    audit: Arc<dyn AuditLog>,
}

impl CompleteEventHandler {
    pub fn new(events: Arc<dyn EventRepository>, audit: Arc<dyn AuditLog>) -> Self {
        Self { events, audit }
    }

    pub async fn handle(&self, cmd: CompleteEventCommand) -> Result<Event, DomainError> {
        cmd.actor.ensure_admin()?;
        let mut event = self
            .events
            .find_by_id(&cmd.event_id)
            .await?
            .ok_or_else(|| event_not_found(&cmd.event_id))?;
        event.complete()?;
        self.events.update(&event).await?;

        record_audit(
            self.audit.as_ref(),
            AuditEntry::record(
                cmd.actor.user_id,
                AuditAction::EventCompleted,
                "event",
                event.id,
                json!({}),
            ),
        )
        .await;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{
        admin, competitor, organizer, published_event, upcoming_details,
    };
    use crate::domain::event::EventStatus;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn organizer_cancels_published_event() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        let cancelled = CancelEventHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
            .handle(CancelEventCommand {
                actor: organizer(),
                event_id: event.id,
            })
            .await
            .unwrap();

        assert_eq!(cancelled.status, EventStatus::Cancelled);
        let audit = store.audit_entries().await;
        assert_eq!(audit[0].action, AuditAction::EventCancelled);
        assert_eq!(audit[0].details["previous_status"], "published");
    }

    #[tokio::test]
    async fn strangers_cannot_cancel() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        let err = CancelEventHandler::new(Arc::new(store.clone()), Arc::new(store))
            .handle(CancelEventCommand {
                actor: competitor("fan-1"),
                event_id: event.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn only_admin_completes() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        let handler = CompleteEventHandler::new(Arc::new(store.clone()), Arc::new(store));

        let err = handler
            .handle(CompleteEventCommand {
                actor: organizer(),
                event_id: event.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let completed = handler
            .handle(CompleteEventCommand {
                actor: admin(),
                event_id: event.id,
            })
            .await
            .unwrap();
        assert_eq!(completed.status, EventStatus::Completed);
    }
}
