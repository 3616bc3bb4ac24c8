//! UpdateEventHandler - Command handler for editing draft events.

use std::sync::Arc;

use super::create_event::locate;
use super::query_events::load_managed_event;
use crate::application::Actor;
use crate::domain::event::{Event, EventDetails};
use crate::domain::foundation::{DomainError, EventId};
use crate::ports::{EventRepository, Geocoder};

#[derive(Debug, Clone)]
pub struct UpdateEventCommand {
    pub actor: Actor,
    pub event_id: EventId,
    pub details: EventDetails,
}

/// Handler for editing an event while it is still a draft.
///
/// A changed location is geocoded again, best-effort.
pub struct UpdateEventHandler {
    events: Arc<dyn EventRepository>,
    geocoder: Arc<dyn Geocoder>,
}

impl UpdateEventHandler {
    pub fn new(events: Arc<dyn EventRepository>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { events, geocoder }
    }

    pub async fn handle(&self, cmd: UpdateEventCommand) -> Result<Event, DomainError> {
        let mut event = load_managed_event(self.events.as_ref(), &cmd.actor, &cmd.event_id).await?;

        let location_changed = event.details.location != cmd.details.location;
        event.update_details(cmd.details)?;
        if location_changed {
            locate(self.geocoder.as_ref(), &mut event).await;
        }

        self.events.update(&event).await?;
        Ok(event)
    }
}
