//! CreateEventHandler - Command handler for creating draft events.

use std::sync::Arc;

use crate::application::Actor;
use crate::domain::event::{Event, EventDetails};
use crate::domain::foundation::DomainError;
use crate::ports::{EventRepository, Geocoder};

/// Command to create a new event.
#[derive(Debug, Clone)]
pub struct CreateEventCommand {
    pub actor: Actor,
    pub details: EventDetails,
}

/// Result of successful event creation.
#[derive(Debug, Clone)]
pub struct CreateEventResult {
    pub event: Event,
    /// False when the venue could not be geocoded.
    pub geocoded: bool,
}

/// Handler for creating events.
///
/// Events start as drafts. The venue is geocoded best-effort; a lookup failure
/// leaves the coordinates empty and never fails the command.
pub struct CreateEventHandler {
    events: Arc<dyn EventRepository>,
    geocoder: Arc<dyn Geocoder>,
}

impl CreateEventHandler {
    pub fn new(events: Arc<dyn EventRepository>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { events, geocoder }
    }

    pub async fn handle(&self, cmd: CreateEventCommand) -> Result<CreateEventResult, DomainError> {
        // 1. Only organizer and admin accounts run events
        if !cmd.actor.can_organize() {
            return Err(DomainError::forbidden(
                "Only organizer accounts can create events",
            ));
        }

        // 2. Build the draft (validates details)
        let mut event = Event::create(cmd.actor.user_id, cmd.details)?;

        // 3. Geocode the venue (non-critical)
        let geocoded = locate(self.geocoder.as_ref(), &mut event).await;

        // 4. Persist
        self.events.save(&event).await?;

        tracing::info!(event_id = %event.id, geocoded, "Event created");

        Ok(CreateEventResult { event, geocoded })
    }
}

/// Sets the event's coordinates from its location. Returns whether it succeeded.
pub(super) async fn locate(geocoder: &dyn Geocoder, event: &mut Event) -> bool {
    match geocoder.geocode(&event.details.location).await {
        Ok(hit) => {
            event.set_coordinates(hit.latitude, hit.longitude);
            true
        }
        Err(e) => {
            tracing::warn!(
                event_id = %event.id,
                error = %e,
                "Venue geocoding failed; saving without coordinates"
            );
            false
        }
    }
}
