//! Shared fixtures for handler tests.

use chrono::{Duration, Utc};

use crate::adapters::memory::InMemoryStore;
use crate::application::Actor;
use crate::domain::account::{profile, AccountType, UserProfile};
use crate::domain::event::{Event, EventDetails, EventType, DEFAULT_MAX_COMPETITORS};
use crate::domain::foundation::UserId;
use crate::domain::geocoding::GeocodeResult;
use crate::ports::{EventRepository, ProfileRepository};

pub(crate) const ORGANIZER: &str = "organizer-1";

pub(crate) fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub(crate) fn organizer() -> Actor {
    Actor::new(user(ORGANIZER), Some(AccountType::Organizer))
}

pub(crate) fn admin() -> Actor {
    Actor::admin(user("admin-1"))
}

pub(crate) fn competitor(id: &str) -> Actor {
    Actor::new(user(id), Some(AccountType::Competitor))
}

/// Event starting a month from today with an early-bird window still open.
pub(crate) fn upcoming_details() -> EventDetails {
    let today = Utc::now().date_naive();
    EventDetails {
        name: "Fall Bass Bash".to_string(),
        event_type: EventType::Spl,
        description: None,
        start_date: today + Duration::days(30),
        end_date: today + Duration::days(31),
        location: "1200 Speedway Blvd, Daytona Beach, FL".to_string(),
        venue_name: Some("Daytona Fairgrounds".to_string()),
        max_competitors: DEFAULT_MAX_COMPETITORS,
        regular_price_cents: 5_000,
        early_bird_price_cents: Some(3_500),
        early_bird_deadline: Some(today + Duration::days(10)),
    }
}

/// Saves a published event owned by `ORGANIZER`.
pub(crate) async fn published_event(store: &InMemoryStore, details: EventDetails) -> Event {
    let mut event = Event::create(user(ORGANIZER), details).unwrap();
    event.submit_for_approval().unwrap();
    event.approve().unwrap();
    EventRepository::save(store, &event).await.unwrap();
    event
}

pub(crate) async fn seed_profile(
    store: &InMemoryStore,
    id: &str,
    account_type: AccountType,
) -> UserProfile {
    let profile = profile(id, account_type);
    ProfileRepository::save(store, &profile).await.unwrap();
    profile
}

pub(crate) fn daytona() -> GeocodeResult {
    GeocodeResult {
        latitude: 29.18,
        longitude: -81.07,
        formatted_address: "1200 Speedway Blvd, Daytona Beach, FL".to_string(),
        confidence: 0.9,
        provider: "mock".to_string(),
    }
}
