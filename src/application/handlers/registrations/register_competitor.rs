//! RegisterCompetitorHandler - Command handler for event registration.

use std::sync::Arc;

use crate::application::handlers::events::event_not_found;
use crate::application::side_effects::queue_email;
use crate::domain::email::templates;
use crate::domain::foundation::{DomainError, ErrorCode, EventId, Timestamp, UserId};
use crate::domain::registration::{CompetitorEntry, Registration};
use crate::ports::{EmailQueue, EventRepository, RegistrationRepository};

/// Command to register the caller for an event.
#[derive(Debug, Clone)]
pub struct RegisterCompetitorCommand {
    pub user_id: UserId,
    pub event_id: EventId,
    pub entry: CompetitorEntry,
}

/// Handler for competitor registration.
///
/// # Rules
///
/// - The event is published and today (UTC) is on or before its start date
/// - Active registrations stay below `max_competitors`
/// - One active registration per user per event
/// - The fee is locked in at registration time; free entries start confirmed
///
/// The capacity check and insert are separate statements, so a burst of
/// concurrent registrations can overshoot the limit by a few entries.
pub struct RegisterCompetitorHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    emails: Arc<dyn EmailQueue>,
}

impl RegisterCompetitorHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        emails: Arc<dyn EmailQueue>,
    ) -> Self {
        Self {
            events,
            registrations,
            emails,
        }
    }

    pub async fn handle(&self, cmd: RegisterCompetitorCommand) -> Result<Registration, DomainError> {
        let now = Timestamp::now();

        // 1. Event must be open
        let event = self
            .events
            .find_by_id(&cmd.event_id)
            .await?
            .ok_or_else(|| event_not_found(&cmd.event_id))?;
        if !event.is_open_for_registration(now.date()) {
            return Err(DomainError::new(
                ErrorCode::EventNotOpen,
                "Event is not open for registration",
            )
            .with_detail("status", event.status.as_str()));
        }

        // 2. One active registration per user
        if self
            .registrations
            .find_active(&event.id, &cmd.user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::new(
                ErrorCode::AlreadyRegistered,
                "Already registered for this event",
            ));
        }

        // 3. Capacity
        let active = self.registrations.count_active(&event.id).await?;
        if active >= event.details.max_competitors {
            return Err(DomainError::new(ErrorCode::EventFull, "Event is full")
                .with_detail("max_competitors", event.details.max_competitors.to_string()));
        }

        // 4. Create and persist
        let registration = Registration::create(&event, cmd.user_id, cmd.entry, now)?;
        self.registrations.save(&registration).await?;

        // 5. Confirmation email (non-critical)
        queue_email(
            self.emails.as_ref(),
            templates::registration_received(&event, &registration),
        )
        .await;

        tracing::info!(
            event_id = %event.id,
            registration_id = %registration.id,
            status = %registration.status,
            "Competitor registered"
        );
        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{published_event, upcoming_details, user};
    use crate::domain::email::templates::REGISTRATION_RECEIVED;
    use crate::domain::event::Event;
    use crate::domain::registration::{sample_entry, RegistrationStatus};

    fn handler(store: &InMemoryStore) -> RegisterCompetitorHandler {
        let store = Arc::new(store.clone());
        RegisterCompetitorHandler::new(store.clone(), store.clone(), store)
    }

    fn command(event: &Event, user_id: &str) -> RegisterCompetitorCommand {
        RegisterCompetitorCommand {
            user_id: user(user_id),
            event_id: event.id,
            entry: sample_entry(),
        }
    }

    #[tokio::test]
    async fn registers_at_early_bird_price_and_queues_confirmation() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;

        let registration = handler(&store).handle(command(&event, "fan-1")).await.unwrap();

        assert_eq!(registration.amount_due_cents, 3_500);
        assert_eq!(registration.status, RegistrationStatus::PendingPayment);
        assert_eq!(registration.entry.email, "dana@example.com");
        let emails = store.queued_emails().await;
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].message.template.as_deref(), Some(REGISTRATION_RECEIVED));
    }

    #[tokio::test]
    async fn free_entry_starts_confirmed() {
        let store = InMemoryStore::new();
        let mut details = upcoming_details();
        details.regular_price_cents = 0;
        details.early_bird_price_cents = None;
        details.early_bird_deadline = None;
        let event = published_event(&store, details).await;

        let registration = handler(&store).handle(command(&event, "fan-1")).await.unwrap();
        assert_eq!(registration.status, RegistrationStatus::Confirmed);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        let handler = handler(&store);

        handler.handle(command(&event, "fan-1")).await.unwrap();
        let err = handler.handle(command(&event, "fan-1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyRegistered);
    }

    #[tokio::test]
    async fn full_event_is_rejected() {
        let store = InMemoryStore::new();
        let mut details = upcoming_details();
        details.max_competitors = 1;
        let event = published_event(&store, details).await;
        let handler = handler(&store);

        handler.handle(command(&event, "fan-1")).await.unwrap();
        let err = handler.handle(command(&event, "fan-2")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EventFull);
    }

    #[tokio::test]
    async fn draft_event_is_not_open() {
        let store = InMemoryStore::new();
        let event = Event::create(user("organizer-1"), upcoming_details()).unwrap();
        EventRepository::save(&store, &event).await.unwrap();

        let err = handler(&store).handle(command(&event, "fan-1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EventNotOpen);
    }

    #[tokio::test]
    async fn past_event_is_not_open() {
        let store = InMemoryStore::new();
        let today = Timestamp::now().date();
        let mut details = upcoming_details();
        details.start_date = today - chrono::Duration::days(1);
        details.end_date = today;
        details.early_bird_deadline = None;
        details.early_bird_price_cents = None;
        let event = published_event(&store, details).await;

        let err = handler(&store).handle(command(&event, "fan-1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EventNotOpen);
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let store = InMemoryStore::new();
        let err = handler(&store)
            .handle(RegisterCompetitorCommand {
                user_id: user("fan-1"),
                event_id: EventId::new(),
                entry: sample_entry(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EventNotFound);
    }
}
