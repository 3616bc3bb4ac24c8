//! Event queries: listing and single lookup.

use std::sync::Arc;

use crate::application::Actor;
use crate::domain::event::{Event, EventStatus, EventType};
use crate::domain::foundation::{DomainError, ErrorCode, EventId, Timestamp};
use crate::ports::{clamp_limit, EventFilter, EventRepository};

/// Query for a page of events.
#[derive(Debug, Clone, Default)]
pub struct ListEventsQuery {
    /// `None` for anonymous callers.
    pub viewer: Option<Actor>,
    pub status: Option<EventStatus>,
    pub event_type: Option<EventType>,
    /// Only events starting today or later.
    pub upcoming_only: bool,
    /// Restrict to the viewer's own events, in any status.
    pub mine: bool,
    pub limit: Option<u32>,
}

/// Handler for listing events.
///
/// Anonymous and non-admin callers only see published events, except for their
/// own events when `mine` is set.
pub struct ListEventsHandler {
    events: Arc<dyn EventRepository>,
}

impl ListEventsHandler {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    pub async fn handle(&self, query: ListEventsQuery) -> Result<Vec<Event>, DomainError> {
        let mut filter = EventFilter {
            status: query.status,
            event_type: query.event_type,
            starts_on_or_after: query.upcoming_only.then(|| Timestamp::now().date()),
            organizer_id: None,
            limit: clamp_limit(query.limit),
        };

        match &query.viewer {
            Some(viewer) if query.mine => filter.organizer_id = Some(viewer.user_id.clone()),
            Some(viewer) if viewer.is_admin() => {}
            _ => filter.status = Some(EventStatus::Published),
        }

        self.events.list(&filter).await
    }
}

/// Query for one event.
#[derive(Debug, Clone)]
pub struct GetEventQuery {
    pub viewer: Option<Actor>,
    pub event_id: EventId,
}

/// Handler for fetching an event.
///
/// Unpublished events are reported as missing to everyone but their organizer
/// and admins.
pub struct GetEventHandler {
    events: Arc<dyn EventRepository>,
}

impl GetEventHandler {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    pub async fn handle(&self, query: GetEventQuery) -> Result<Event, DomainError> {
        let event = self
            .events
            .find_by_id(&query.event_id)
            .await?
            .ok_or_else(|| event_not_found(&query.event_id))?;

        let visible = event.status.is_public()
            || query
                .viewer
                .as_ref()
                .is_some_and(|v| v.can_act_for(&event.organizer_id));
        if !visible {
            return Err(event_not_found(&query.event_id));
        }
        Ok(event)
    }
}

pub(crate) fn event_not_found(id: &EventId) -> DomainError {
    DomainError::new(ErrorCode::EventNotFound, format!("Event {} not found", id))
}

/// Loads an event the actor organizes (or any event, for admins).
pub(crate) async fn load_managed_event(
    events: &dyn EventRepository,
    actor: &Actor,
    event_id: &EventId,
) -> Result<Event, DomainError> {
    let event = events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| event_not_found(event_id))?;
    actor.ensure_can_act_for(&event.organizer_id, "event")?;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{
        admin, competitor, organizer, published_event, upcoming_details, user, ORGANIZER,
    };

    async fn seeded() -> (InMemoryStore, Event, Event) {
        let store = InMemoryStore::new();
        let published = published_event(&store, upcoming_details()).await;
        let draft = Event::create(user(ORGANIZER), upcoming_details()).unwrap();
        store.save(&draft).await.unwrap();
        (store, published, draft)
    }

    #[tokio::test]
    async fn public_listing_shows_only_published() {
        let (store, published, _) = seeded().await;
        let events = ListEventsHandler::new(Arc::new(store))
            .handle(ListEventsQuery {
                status: Some(EventStatus::Draft),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, published.id);
    }

    #[tokio::test]
    async fn admin_sees_every_status() {
        let (store, _, draft) = seeded().await;
        let events = ListEventsHandler::new(Arc::new(store))
            .handle(ListEventsQuery {
                viewer: Some(admin()),
                status: Some(EventStatus::Draft),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, draft.id);
    }

    #[tokio::test]
    async fn organizer_lists_own_drafts_with_mine() {
        let (store, _, _) = seeded().await;
        let events = ListEventsHandler::new(Arc::new(store))
            .handle(ListEventsQuery {
                viewer: Some(organizer()),
                mine: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn limit_is_clamped() {
        let store = InMemoryStore::new();
        for _ in 0..3 {
            published_event(&store, upcoming_details()).await;
        }
        let events = ListEventsHandler::new(Arc::new(store))
            .handle(ListEventsQuery {
                limit: Some(0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_other_users() {
        let (store, _, draft) = seeded().await;
        let handler = GetEventHandler::new(Arc::new(store));

        let err = handler
            .handle(GetEventQuery {
                viewer: Some(competitor("fan-1")),
                event_id: draft.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EventNotFound);

        let own = handler
            .handle(GetEventQuery {
                viewer: Some(organizer()),
                event_id: draft.id,
            })
            .await
            .unwrap();
        assert_eq!(own.id, draft.id);
    }
}
