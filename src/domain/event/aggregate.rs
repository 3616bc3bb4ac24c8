//! Event aggregate.
//!
//! An event is created as a draft by its organizer, submitted for admin approval,
//! and once published accepts competitor registrations until its start date.
//!
//! # Invariants
//!
//! - `name` and `location` are non-blank
//! - `start_date <= end_date`
//! - `1 <= max_competitors <= 10_000`
//! - prices are non-negative and an early-bird price never exceeds the regular price
//! - an early-bird deadline falls on or before the start date
//! - only drafts are editable

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, StateMachine, Timestamp, UserId, ValidationError,
};

use super::{EventStatus, EventType};

pub const DEFAULT_MAX_COMPETITORS: u32 = 100;
pub const MAX_COMPETITORS_LIMIT: u32 = 10_000;

/// Organizer-editable fields of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub name: String,
    pub event_type: EventType,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Free-text street address, geocoded best-effort.
    pub location: String,
    pub venue_name: Option<String>,
    pub max_competitors: u32,
    pub regular_price_cents: i64,
    pub early_bird_price_cents: Option<i64>,
    pub early_bird_deadline: Option<NaiveDate>,
}

impl EventDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::empty_field("location"));
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::invalid_format(
                "end_date",
                "must be on or after start_date",
            ));
        }
        if self.max_competitors == 0 || self.max_competitors > MAX_COMPETITORS_LIMIT {
            return Err(ValidationError::out_of_range(
                "max_competitors",
                1,
                MAX_COMPETITORS_LIMIT as i64,
                self.max_competitors as i64,
            ));
        }
        if self.regular_price_cents < 0 {
            return Err(ValidationError::out_of_range(
                "regular_price_cents",
                0,
                i64::MAX,
                self.regular_price_cents,
            ));
        }
        if let Some(early) = self.early_bird_price_cents {
            if early < 0 || early > self.regular_price_cents {
                return Err(ValidationError::out_of_range(
                    "early_bird_price_cents",
                    0,
                    self.regular_price_cents,
                    early,
                ));
            }
        }
        if let Some(deadline) = self.early_bird_deadline {
            if deadline > self.start_date {
                return Err(ValidationError::invalid_format(
                    "early_bird_deadline",
                    "must be on or before start_date",
                ));
            }
        }
        Ok(())
    }
}

/// Competition event aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub organizer_id: UserId,
    #[serde(flatten)]
    pub details: EventDetails,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: EventStatus,
    /// Admin note from the most recent rejection.
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    /// Creates a new draft event.
    pub fn create(organizer_id: UserId, details: EventDetails) -> Result<Self, ValidationError> {
        details.validate()?;
        let now = Timestamp::now();
        Ok(Self {
            id: EventId::new(),
            organizer_id,
            details,
            latitude: None,
            longitude: None,
            status: EventStatus::Draft,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_organizer(&self, user_id: &UserId) -> bool {
        &self.organizer_id == user_id
    }

    /// Replaces the editable fields. Only drafts can be edited; coordinates are
    /// cleared when the location changes.
    pub fn update_details(&mut self, details: EventDetails) -> Result<(), DomainError> {
        if self.status != EventStatus::Draft {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Only draft events can be edited",
            ));
        }
        details.validate()?;
        if details.location != self.details.location {
            self.latitude = None;
            self.longitude = None;
        }
        self.details = details;
        self.touch();
        Ok(())
    }

    pub fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self.touch();
    }

    pub fn submit_for_approval(&mut self) -> Result<(), DomainError> {
        self.transition(EventStatus::PendingApproval)
    }

    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.transition(EventStatus::Published)?;
        self.rejection_reason = None;
        Ok(())
    }

    /// Sends the event back to draft with the admin's reason.
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(ValidationError::empty_field("reason").into());
        }
        self.transition(EventStatus::Draft)?;
        self.rejection_reason = Some(reason);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition(EventStatus::Cancelled)
    }

    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.transition(EventStatus::Completed)
    }

    /// Registration is open for published events through their start date.
    pub fn is_open_for_registration(&self, today: NaiveDate) -> bool {
        self.status == EventStatus::Published && today <= self.details.start_date
    }

    /// Entry fee for a registration made on `today`.
    pub fn price_on(&self, today: NaiveDate) -> i64 {
        match (
            self.details.early_bird_price_cents,
            self.details.early_bird_deadline,
        ) {
            (Some(early), Some(deadline)) if today <= deadline => early,
            _ => self.details.regular_price_cents,
        }
    }

    fn transition(&mut self, target: EventStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target)?;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn sample_details() -> EventDetails {
        EventDetails {
            name: "Summer Bass Bash".to_string(),
            event_type: EventType::Spl,
            description: Some("Two lanes, SPL and SQ classes".to_string()),
            start_date: date(2026, 7, 18),
            end_date: date(2026, 7, 19),
            location: "1200 Speedway Blvd, Daytona Beach, FL".to_string(),
            venue_name: Some("Daytona Fairgrounds".to_string()),
            max_competitors: DEFAULT_MAX_COMPETITORS,
            regular_price_cents: 5_000,
            early_bird_price_cents: Some(3_500),
            early_bird_deadline: Some(date(2026, 7, 1)),
        }
    }

    fn organizer() -> UserId {
        UserId::new("organizer-1").unwrap()
    }

    #[test]
    fn new_event_starts_as_draft() {
        let event = Event::create(organizer(), sample_details()).unwrap();
        assert_eq!(event.status, EventStatus::Draft);
        assert!(event.latitude.is_none());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let details = EventDetails {
            end_date: date(2026, 7, 17),
            ..sample_details()
        };
        assert!(Event::create(organizer(), details).is_err());
    }

    #[test]
    fn early_bird_above_regular_is_rejected() {
        let details = EventDetails {
            early_bird_price_cents: Some(6_000),
            ..sample_details()
        };
        let err = Event::create(organizer(), details).unwrap_err();
        assert_eq!(err.field(), "early_bird_price_cents");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let details = EventDetails {
            max_competitors: 0,
            ..sample_details()
        };
        assert!(Event::create(organizer(), details).is_err());
    }

    #[test]
    fn early_bird_price_applies_through_deadline() {
        let event = Event::create(organizer(), sample_details()).unwrap();
        assert_eq!(event.price_on(date(2026, 7, 1)), 3_500);
        assert_eq!(event.price_on(date(2026, 7, 2)), 5_000);
    }

    #[test]
    fn regular_price_when_no_early_bird_configured() {
        let details = EventDetails {
            early_bird_price_cents: None,
            early_bird_deadline: None,
            ..sample_details()
        };
        let event = Event::create(organizer(), details).unwrap();
        assert_eq!(event.price_on(date(2026, 1, 1)), 5_000);
    }

    #[test]
    fn full_approval_flow_publishes_event() {
        let mut event = Event::create(organizer(), sample_details()).unwrap();
        event.submit_for_approval().unwrap();
        event.approve().unwrap();
        assert_eq!(event.status, EventStatus::Published);
        assert!(event.is_open_for_registration(date(2026, 7, 18)));
        assert!(!event.is_open_for_registration(date(2026, 7, 19)));
    }

    #[test]
    fn reject_records_reason_and_returns_to_draft() {
        let mut event = Event::create(organizer(), sample_details()).unwrap();
        event.submit_for_approval().unwrap();
        event.reject("Venue address incomplete").unwrap();
        assert_eq!(event.status, EventStatus::Draft);
        assert_eq!(
            event.rejection_reason.as_deref(),
            Some("Venue address incomplete")
        );
    }

    #[test]
    fn reject_requires_reason() {
        let mut event = Event::create(organizer(), sample_details()).unwrap();
        event.submit_for_approval().unwrap();
        assert!(event.reject("  ").is_err());
        assert_eq!(event.status, EventStatus::PendingApproval);
    }

    #[test]
    fn approving_a_draft_is_an_invalid_transition() {
        let mut event = Event::create(organizer(), sample_details()).unwrap();
        let err = event.approve().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn published_event_cannot_be_edited() {
        let mut event = Event::create(organizer(), sample_details()).unwrap();
        event.submit_for_approval().unwrap();
        event.approve().unwrap();
        assert!(event.update_details(sample_details()).is_err());
    }

    #[test]
    fn changing_location_clears_coordinates() {
        let mut event = Event::create(organizer(), sample_details()).unwrap();
        event.set_coordinates(29.18, -81.07);
        let details = EventDetails {
            location: "500 Main St, Orlando, FL".to_string(),
            ..sample_details()
        };
        event.update_details(details).unwrap();
        assert!(event.latitude.is_none());
    }
}
