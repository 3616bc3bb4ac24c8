//! Registration queries.

use std::sync::Arc;

use crate::application::handlers::events::event_not_found;
use crate::application::Actor;
use crate::domain::event::Event;
use crate::domain::foundation::{DomainError, ErrorCode, EventId, RegistrationId, UserId};
use crate::domain::registration::{Registration, RegistrationStatus};
use crate::ports::{EventRepository, RegistrationFilter, RegistrationRepository};

#[derive(Debug, Clone)]
pub struct ListRegistrationsQuery {
    pub actor: Actor,
    pub event_id: Option<EventId>,
    pub user_id: Option<UserId>,
    pub status: Option<RegistrationStatus>,
}

/// Handler for listing registrations.
///
/// Admins may list anything. The organizer of `event_id` sees that event's
/// entries. Everyone else only sees their own registrations.
pub struct ListRegistrationsHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl ListRegistrationsHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            events,
            registrations,
        }
    }

    pub async fn handle(&self, query: ListRegistrationsQuery) -> Result<Vec<Registration>, DomainError> {
        let mut filter = RegistrationFilter {
            event_id: query.event_id,
            user_id: query.user_id,
            status: query.status,
        };

        if !query.actor.is_admin() {
            let organizes = match &query.event_id {
                Some(event_id) => self
                    .events
                    .find_by_id(event_id)
                    .await?
                    .is_some_and(|e| e.is_organizer(&query.actor.user_id)),
                None => false,
            };
            if !organizes {
                filter.user_id = Some(query.actor.user_id.clone());
            }
        }

        self.registrations.list(&filter).await
    }
}

#[derive(Debug, Clone)]
pub struct GetRegistrationQuery {
    pub actor: Actor,
    pub registration_id: RegistrationId,
}

/// Handler for fetching one registration (owner, event organizer or admin).
pub struct GetRegistrationHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl GetRegistrationHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            events,
            registrations,
        }
    }

    pub async fn handle(&self, query: GetRegistrationQuery) -> Result<Registration, DomainError> {
        let (registration, event) = load_with_event(
            self.events.as_ref(),
            self.registrations.as_ref(),
            &query.registration_id,
        )
        .await?;

        if registration.is_owner(&query.actor.user_id)
            || query.actor.can_act_for(&event.organizer_id)
        {
            Ok(registration)
        } else {
            Err(registration_not_found(&query.registration_id))
        }
    }
}

pub(crate) fn registration_not_found(id: &RegistrationId) -> DomainError {
    DomainError::new(
        ErrorCode::RegistrationNotFound,
        format!("Registration {} not found", id),
    )
}

/// Loads a registration together with its event.
pub(crate) async fn load_with_event(
    events: &dyn EventRepository,
    registrations: &dyn RegistrationRepository,
    id: &RegistrationId,
) -> Result<(Registration, Event), DomainError> {
    let registration = registrations
        .find_by_id(id)
        .await?
        .ok_or_else(|| registration_not_found(id))?;
    let event = events
        .find_by_id(&registration.event_id)
        .await?
        .ok_or_else(|| event_not_found(&registration.event_id))?;
    Ok((registration, event))
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
    use crate::domain::registration::sample_entry;

    async fn register(store: &InMemoryStore, event: &Event, who: &str) -> Registration {
        let store = Arc::new(store.clone());
        RegisterCompetitorHandler::new(store.clone(), store.clone(), store)
            .handle(RegisterCompetitorCommand {
                user_id: user(who),
                event_id: event.id,
                entry: sample_entry(),
            })
            .await
            .unwrap()
    }

    fn list_handler(store: &InMemoryStore) -> ListRegistrationsHandler {
        ListRegistrationsHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn competitors_only_see_their_own() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        register(&store, &event, "fan-1").await;
        register(&store, &event, "fan-2").await;

        let mine = list_handler(&store)
            .handle(ListRegistrationsQuery {
                actor: competitor("fan-1"),
                event_id: Some(event.id),
                user_id: None,
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, user("fan-1"));
    }

    #[tokio::test]
    async fn organizer_and_admin_see_all_entries() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        register(&store, &event, "fan-1").await;
        register(&store, &event, "fan-2").await;

        for actor in [organizer(), admin()] {
            let all = list_handler(&store)
                .handle(ListRegistrationsQuery {
                    actor,
                    event_id: Some(event.id),
                    user_id: None,
                    status: Some(RegistrationStatus::PendingPayment),
                })
                .await
                .unwrap();
            assert_eq!(all.len(), 2);
        }
    }

    #[tokio::test]
    async fn strangers_cannot_read_a_registration() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        let registration = register(&store, &event, "fan-1").await;
        let handler = GetRegistrationHandler::new(Arc::new(store.clone()), Arc::new(store));

        let err = handler
            .handle(GetRegistrationQuery {
                actor: competitor("fan-2"),
                registration_id: registration.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RegistrationNotFound);

        let found = handler
            .handle(GetRegistrationQuery {
                actor: organizer(),
                registration_id: registration.id,
            })
            .await
            .unwrap();
        assert_eq!(found.id, registration.id);
    }
}
