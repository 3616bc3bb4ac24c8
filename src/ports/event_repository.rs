//! Event repository port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::event::{Event, EventStatus, EventType};
use crate::domain::foundation::{DomainError, EventId, UserId};

/// Default page size for event listings.
pub const DEFAULT_EVENT_LIMIT: u32 = 10;
pub const MAX_EVENT_LIMIT: u32 = 100;

/// Listing filters. Results are ordered by start date, soonest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub event_type: Option<EventType>,
    /// Only events starting on or after this date.
    pub starts_on_or_after: Option<NaiveDate>,
    pub organizer_id: Option<UserId>,
    pub limit: u32,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            status: None,
            event_type: None,
            starts_on_or_after: None,
            organizer_id: None,
            limit: DEFAULT_EVENT_LIMIT,
        }
    }
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.status.map_or(true, |s| event.status == s)
            && self.event_type.map_or(true, |t| event.details.event_type == t)
            && self
                .starts_on_or_after
                .map_or(true, |d| event.details.start_date >= d)
            && self
                .organizer_id
                .as_ref()
                .map_or(true, |o| &event.organizer_id == o)
    }
}

/// Clamps a requested page size into `1..=MAX_EVENT_LIMIT`.
pub fn clamp_limit(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_EVENT_LIMIT)
        .clamp(1, MAX_EVENT_LIMIT)
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn save(&self, event: &Event) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `EventNotFound` if the event doesn't exist
    async fn update(&self, event: &Event) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, DomainError>;

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn EventRepository) {}
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_limit(None), 10);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), 100);
        assert_eq!(clamp_limit(Some(25)), 25);
    }
}
