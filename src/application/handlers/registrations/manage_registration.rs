//! Registration status changes: approval, cancellation and venue check-in.

use std::sync::Arc;

use super::query_registrations::load_with_event;
use crate::application::Actor;
use crate::domain::foundation::{DomainError, ErrorCode, RegistrationId};
use crate::domain::registration::{CheckIn, Registration};
use crate::ports::{EventRepository, RegistrationRepository};

#[derive(Debug, Clone)]
pub struct ApproveRegistrationCommand {
    pub actor: Actor,
    pub registration_id: RegistrationId,
}

/// Organizer or admin accepts a confirmed entry into the competition.
pub struct ApproveRegistrationHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl ApproveRegistrationHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            events,
            registrations,
        }
    }

    pub async fn handle(&self, cmd: ApproveRegistrationCommand) -> Result<Registration, DomainError> {
        let (mut registration, event) = load_with_event(
            self.events.as_ref(),
            self.registrations.as_ref(),
            &cmd.registration_id,
        )
        .await?;
        cmd.actor.ensure_can_act_for(&event.organizer_id, "event")?;

        registration.approve()?;
        self.registrations.update(&registration).await?;
        Ok(registration)
    }
}

#[derive(Debug, Clone)]
pub struct CancelRegistrationCommand {
    pub actor: Actor,
    pub registration_id: RegistrationId,
}

/// Owner, event organizer or admin withdraws an entry.
///
/// Cancelling frees the slot. Paid entries are refunded separately.
pub struct CancelRegistrationHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl CancelRegistrationHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            events,
            registrations,
        }
    }

    pub async fn handle(&self, cmd: CancelRegistrationCommand) -> Result<Registration, DomainError> {
        let (mut registration, event) = load_with_event(
            self.events.as_ref(),
            self.registrations.as_ref(),
            &cmd.registration_id,
        )
        .await?;
        if !registration.is_owner(&cmd.actor.user_id) {
            cmd.actor.ensure_can_act_for(&event.organizer_id, "registration")?;
        }

        registration.cancel()?;
        self.registrations.update(&registration).await?;
        Ok(registration)
    }
}

#[derive(Debug, Clone)]
pub struct CheckInCommand {
    pub actor: Actor,
    pub registration_id: RegistrationId,
}

/// Records a competitor's arrival. At most one check-in per registration.
pub struct CheckInHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl CheckInHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            events,
            registrations,
        }
    }

    pub async fn handle(&self, cmd: CheckInCommand) -> Result<CheckIn, DomainError> {
        let (registration, event) = load_with_event(
            self.events.as_ref(),
            self.registrations.as_ref(),
            &cmd.registration_id,
        )
        .await?;
        cmd.actor.ensure_can_act_for(&event.organizer_id, "event")?;

        if !registration.status.can_check_in() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot check in a {} registration", registration.status),
            ));
        }

        let check_in = CheckIn::record(&registration, cmd.actor.user_id);
        self.registrations.record_check_in(&check_in).await?;
        tracing::info!(
            event_id = %event.id,
            registration_id = %registration.id,
            "Competitor checked in"
        );
        Ok(check_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::registrations::{
        RegisterCompetitorCommand, RegisterCompetitorHandler,
    };
    use crate::application::handlers::test_support::{
        admin, competitor, organizer, published_event, upcoming_details, user,
    };
    use crate::domain::event::EventDetails;
    use crate::domain::registration::{sample_entry, RegistrationStatus};

    fn free_details() -> EventDetails {
        let mut details = upcoming_details();
        details.regular_price_cents = 0;
        details.early_bird_price_cents = None;
        details.early_bird_deadline = None;
        details
    }

    async fn register(store: &InMemoryStore, details: EventDetails) -> Registration {
        let event = published_event(store, details).await;
        let shared = Arc::new(store.clone());
        RegisterCompetitorHandler::new(shared.clone(), shared.clone(), shared)
            .handle(RegisterCompetitorCommand {
                user_id: user("fan-1"),
                event_id: event.id,
                entry: sample_entry(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn organizer_approves_confirmed_entry() {
        let store = InMemoryStore::new();
        let registration = register(&store, free_details()).await;

        let approved = ApproveRegistrationHandler::new(Arc::new(store.clone()), Arc::new(store))
            .handle(ApproveRegistrationCommand {
                actor: organizer(),
                registration_id: registration.id,
            })
            .await
            .unwrap();
        assert_eq!(approved.status, RegistrationStatus::Approved);
    }

    #[tokio::test]
    async fn unpaid_entry_cannot_be_approved() {
        let store = InMemoryStore::new();
        let registration = register(&store, upcoming_details()).await;

        let err = ApproveRegistrationHandler::new(Arc::new(store.clone()), Arc::new(store))
            .handle(ApproveRegistrationCommand {
                actor: admin(),
                registration_id: registration.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn owner_cancels_and_strangers_cannot() {
        let store = InMemoryStore::new();
        let registration = register(&store, upcoming_details()).await;
        let handler = CancelRegistrationHandler::new(Arc::new(store.clone()), Arc::new(store));

        let err = handler
            .handle(CancelRegistrationCommand {
                actor: competitor("fan-2"),
                registration_id: registration.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let cancelled = handler
            .handle(CancelRegistrationCommand {
                actor: competitor("fan-1"),
                registration_id: registration.id,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status, RegistrationStatus::Cancelled);
    }

    #[tokio::test]
    async fn check_in_happens_once() {
        let store = InMemoryStore::new();
        let registration = register(&store, free_details()).await;
        let handler = CheckInHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));
        let cmd = CheckInCommand {
            actor: organizer(),
            registration_id: registration.id,
        };

        let check_in = handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(check_in.registration_id, registration.id);

        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyCheckedIn);
    }

    #[tokio::test]
    async fn unpaid_entry_cannot_check_in() {
        let store = InMemoryStore::new();
        let registration = register(&store, upcoming_details()).await;

        let err = CheckInHandler::new(Arc::new(store.clone()), Arc::new(store))
            .handle(CheckInCommand {
                actor: organizer(),
                registration_id: registration.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }
}
