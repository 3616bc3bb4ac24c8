//! Event handlers.
//!
//! ## Commands
//! - Creating drafts (with best-effort venue geocoding) and editing them
//! - Submitting, approving and rejecting events
//! - Cancelling and completing events
//!
//! ## Queries
//! - Listing events (published only for the public)
//! - Fetching a single event

mod close_event;
mod create_event;
mod query_events;
mod review_event;
mod update_event;

// Commands
pub use close_event::{
    CancelEventCommand, CancelEventHandler, CompleteEventCommand, CompleteEventHandler,
};
pub use create_event::{CreateEventCommand, CreateEventHandler, CreateEventResult};
pub use review_event::{
    EventDecision, ReviewEventCommand, ReviewEventHandler, SubmitEventCommand, SubmitEventHandler,
};
pub use update_event::{UpdateEventCommand, UpdateEventHandler};

// Queries
pub use query_events::{GetEventHandler, GetEventQuery, ListEventsHandler, ListEventsQuery};

pub(crate) use query_events::{event_not_found, load_managed_event};
