//! Event approval workflow: submit, approve and reject.

use std::sync::Arc;

use serde_json::json;

use super::query_events::{event_not_found, load_managed_event};
use crate::application::side_effects::{queue_email, record_audit};
use crate::application::Actor;
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::email::templates;
use crate::domain::event::Event;
use crate::domain::foundation::{DomainError, EventId};
use crate::ports::{AuditLog, EmailQueue, EventRepository, ProfileRepository};

/// Organizer sends a draft to the admins.
#[derive(Debug, Clone)]
pub struct SubmitEventCommand {
    pub actor: Actor,
    pub event_id: EventId,
}

pub struct SubmitEventHandler {
    events: Arc<dyn EventRepository>,
}

impl SubmitEventHandler {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    pub async fn handle(&self, cmd: SubmitEventCommand) -> Result<Event, DomainError> {
        let mut event = load_managed_event(self.events.as_ref(), &cmd.actor, &cmd.event_id).await?;
        event.submit_for_approval()?;
        self.events.update(&event).await?;
        Ok(event)
    }
}

/// Admin decision on a pending event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDecision {
    Approve,
    Reject { reason: String },
}

#[derive(Debug, Clone)]
pub struct ReviewEventCommand {
    pub actor: Actor,
    pub event_id: EventId,
    pub decision: EventDecision,
}

/// Handler for admin review of submitted events.
///
/// The status change is the primary write. The audit record and the organizer
/// notification follow and are best-effort.
pub struct ReviewEventHandler {
    events: Arc<dyn EventRepository>,
    profiles: Arc<dyn ProfileRepository>,
    emails: Arc<dyn EmailQueue>,
    audit: Arc<dyn AuditLog>,
}

impl ReviewEventHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        profiles: Arc<dyn ProfileRepository>,
        emails: Arc<dyn EmailQueue>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            events,
            profiles,
            emails,
            audit,
        }
    }

    pub async fn handle(&self, cmd: ReviewEventCommand) -> Result<Event, DomainError> {
        // 1. Admins only
        cmd.actor.ensure_admin()?;

        // 2. Load and transition
        let mut event = self
            .events
            .find_by_id(&cmd.event_id)
            .await?
            .ok_or_else(|| event_not_found(&cmd.event_id))?;

        let (action, details) = match &cmd.decision {
            EventDecision::Approve => {
                event.approve()?;
                (AuditAction::EventApproved, json!({}))
            }
            EventDecision::Reject { reason } => {
                event.reject(reason.clone())?;
                (AuditAction::EventRejected, json!({ "reason": reason }))
            }
        };

        // 3. Persist
        self.events.update(&event).await?;

        // 4. Audit (non-critical)
        record_audit(
            self.audit.as_ref(),
            AuditEntry::record(cmd.actor.user_id, action, "event", event.id, details),
        )
        .await;

        // 5. Notify the organizer (non-critical)
        self.notify_organizer(&event, &cmd.decision).await;

        tracing::info!(event_id = %event.id, status = %event.status, "Event reviewed");
        Ok(event)
    }

    async fn notify_organizer(&self, event: &Event, decision: &EventDecision) {
        let organizer = match self.profiles.find_by_id(&event.organizer_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::warn!(event_id = %event.id, "Organizer profile missing; no notification sent");
                return;
            }
            Err(e) => {
                tracing::warn!(event_id = %event.id, error = %e, "Failed to load organizer profile");
                return;
            }
        };
        let message = match decision {
            EventDecision::Approve => templates::event_approved(event, &organizer.email),
            EventDecision::Reject { reason } => {
                templates::event_rejected(event, &organizer.email, reason)
            }
        };
        queue_email(self.emails.as_ref(), message).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{
        admin, organizer, seed_profile, upcoming_details, user, ORGANIZER,
    };
    use crate::domain::account::AccountType;
    use crate::domain::email::templates::{EVENT_APPROVED, EVENT_REJECTED};
    use crate::domain::event::EventStatus;
    use crate::domain::foundation::ErrorCode;

    async fn pending(store: &InMemoryStore) -> Event {
        let event = Event::create(user(ORGANIZER), upcoming_details()).unwrap();
        EventRepository::save(store, &event).await.unwrap();
        SubmitEventHandler::new(Arc::new(store.clone()))
            .handle(SubmitEventCommand {
                actor: organizer(),
                event_id: event.id,
            })
            .await
            .unwrap()
    }

    fn handler(store: &InMemoryStore) -> ReviewEventHandler {
        let store = Arc::new(store.clone());
        ReviewEventHandler::new(store.clone(), store.clone(), store.clone(), store)
    }

    #[tokio::test]
    async fn approval_publishes_audits_and_notifies() {
        let store = InMemoryStore::new();
        seed_profile(&store, ORGANIZER, AccountType::Organizer).await;
        let event = pending(&store).await;
        assert_eq!(event.status, EventStatus::PendingApproval);

        let approved = handler(&store)
            .handle(ReviewEventCommand {
                actor: admin(),
                event_id: event.id,
                decision: EventDecision::Approve,
            })
            .await
            .unwrap();

        assert_eq!(approved.status, EventStatus::Published);
        let audit = store.audit_entries().await;
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, AuditAction::EventApproved);
        let emails = store.queued_emails().await;
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].message.to, "organizer-1@example.com");
        assert_eq!(emails[0].message.template.as_deref(), Some(EVENT_APPROVED));
    }

    #[tokio::test]
    async fn rejection_returns_to_draft_with_reason() {
        let store = InMemoryStore::new();
        seed_profile(&store, ORGANIZER, AccountType::Organizer).await;
        let event = pending(&store).await;

        let rejected = handler(&store)
            .handle(ReviewEventCommand {
                actor: admin(),
                event_id: event.id,
                decision: EventDecision::Reject {
                    reason: "Missing venue permit".into(),
                },
            })
            .await
            .unwrap();

        assert_eq!(rejected.status, EventStatus::Draft);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Missing venue permit"));
        let emails = store.queued_emails().await;
        assert_eq!(emails[0].message.template.as_deref(), Some(EVENT_REJECTED));
    }

    #[tokio::test]
    async fn missing_organizer_profile_does_not_fail_approval() {
        let store = InMemoryStore::new();
        let event = pending(&store).await;

        let approved = handler(&store)
            .handle(ReviewEventCommand {
                actor: admin(),
                event_id: event.id,
                decision: EventDecision::Approve,
            })
            .await
            .unwrap();
        assert_eq!(approved.status, EventStatus::Published);
        assert!(store.queued_emails().await.is_empty());
    }

    #[tokio::test]
    async fn organizers_cannot_approve() {
        let store = InMemoryStore::new();
        let event = pending(&store).await;
        let err = handler(&store)
            .handle(ReviewEventCommand {
                actor: organizer(),
                event_id: event.id,
                decision: EventDecision::Approve,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn drafts_cannot_be_approved() {
        let store = InMemoryStore::new();
        let event = Event::create(user(ORGANIZER), upcoming_details()).unwrap();
        EventRepository::save(&store, &event).await.unwrap();
        let err = handler(&store)
            .handle(ReviewEventCommand {
                actor: admin(),
                event_id: event.id,
                decision: EventDecision::Approve,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }
}
