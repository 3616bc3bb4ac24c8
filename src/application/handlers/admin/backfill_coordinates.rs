//! BackfillCoordinatesHandler - locates events and listings saved without
//! coordinates.
//!
//! Geocoding at creation is best-effort, so provider outages leave rows
//! without a position. This sweep retries them as one batch per kind.

use std::sync::Arc;

use serde::Serialize;

use crate::application::Actor;
use crate::domain::foundation::DomainError;
use crate::ports::{
    DirectoryRepository, EventFilter, EventRepository, Geocoder, ListingFilter, MAX_EVENT_LIMIT,
};

/// Counts from one backfill run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub events_located: u32,
    pub events_failed: u32,
    pub listings_located: u32,
    pub listings_failed: u32,
}

/// Admin sweep over rows missing coordinates.
///
/// At most `MAX_EVENT_LIMIT` events are considered per run. Listings without
/// an address are skipped.
pub struct BackfillCoordinatesHandler {
    events: Arc<dyn EventRepository>,
    directory: Arc<dyn DirectoryRepository>,
    geocoder: Arc<dyn Geocoder>,
}

impl BackfillCoordinatesHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        directory: Arc<dyn DirectoryRepository>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            events,
            directory,
            geocoder,
        }
    }

    pub async fn handle(&self, actor: &Actor) -> Result<BackfillReport, DomainError> {
        actor.ensure_admin()?;
        let mut report = BackfillReport::default();

        let filter = EventFilter {
            limit: MAX_EVENT_LIMIT,
            ..Default::default()
        };
        let mut events: Vec<_> = self
            .events
            .list(&filter)
            .await?
            .into_iter()
            .filter(|e| e.latitude.is_none() || e.longitude.is_none())
            .collect();
        let addresses: Vec<String> = events.iter().map(|e| e.details.location.clone()).collect();
        let results = self.geocoder.geocode_batch(&addresses).await;
        for (event, result) in events.iter_mut().zip(results) {
            match result {
                Ok(hit) => {
                    event.set_coordinates(hit.latitude, hit.longitude);
                    self.events.update(event).await?;
                    report.events_located += 1;
                }
                Err(e) => {
                    tracing::warn!(event_id = %event.id, error = %e, "Event still unlocated");
                    report.events_failed += 1;
                }
            }
        }

        let mut listings: Vec<_> = self
            .directory
            .list(&ListingFilter::default())
            .await?
            .into_iter()
            .filter(|l| l.latitude.is_none() || l.longitude.is_none())
            .filter(|l| {
                l.details
                    .address
                    .as_deref()
                    .is_some_and(|a| !a.trim().is_empty())
            })
            .collect();
        let addresses: Vec<String> = listings
            .iter()
            .filter_map(|l| l.details.address.clone())
            .collect();
        let results = self.geocoder.geocode_batch(&addresses).await;
        for (listing, result) in listings.iter_mut().zip(results) {
            match result {
                Ok(hit) => {
                    listing.set_coordinates(hit.latitude, hit.longitude);
                    self.directory.update(listing).await?;
                    report.listings_located += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        listing_id = %listing.id,
                        error = %e,
                        "Listing still unlocated"
                    );
                    report.listings_failed += 1;
                }
            }
        }

        tracing::info!(
            events_located = report.events_located,
            listings_located = report.listings_located,
            "Coordinate backfill finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::geocoding::{FallbackGeocoder, MockGeocoder};
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{
        admin, competitor, daytona, published_event, upcoming_details, user,
    };
    use crate::domain::directory::tests::shop_details;
    use crate::domain::directory::DirectoryListing;
    use crate::domain::event::Event;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::geocoding::GeocodeError;

    async fn unlocated_listing(store: &InMemoryStore, address: Option<&str>) -> DirectoryListing {
        let mut details = shop_details();
        details.address = address.map(str::to_string);
        let listing = DirectoryListing::create(user("shop-1"), details).unwrap();
        DirectoryRepository::save(store, &listing).await.unwrap();
        listing
    }

    #[tokio::test]
    async fn locates_rows_through_the_secondary_provider() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        let listing = unlocated_listing(&store, Some("42 Main St, Tampa, FL")).await;
        unlocated_listing(&store, None).await;

        let geocoder = FallbackGeocoder::new(Arc::new(
            MockGeocoder::new("google").with_error(GeocodeError::no_results("google")),
        ))
        .with_secondary(Arc::new(MockGeocoder::new("nominatim").with_default(daytona())));
        let handler = BackfillCoordinatesHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(geocoder),
        );

        let report = handler.handle(&admin()).await.unwrap();
        assert_eq!(
            report,
            BackfillReport {
                events_located: 1,
                events_failed: 0,
                listings_located: 1,
                listings_failed: 0,
            }
        );

        let event = EventRepository::find_by_id(&store, &event.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.latitude, Some(29.18));
        let listing = DirectoryRepository::find_by_id(&store, &listing.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(listing.longitude, Some(-81.07));
    }

    #[tokio::test]
    async fn failures_are_counted_and_rows_left_alone() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        let handler = BackfillCoordinatesHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(MockGeocoder::new("google").with_error(GeocodeError::no_results("google"))),
        );

        let report = handler.handle(&admin()).await.unwrap();
        assert_eq!(report.events_failed, 1);
        assert_eq!(report.events_located, 0);
        let event = EventRepository::find_by_id(&store, &event.id)
            .await
            .unwrap()
            .unwrap();
        assert!(event.latitude.is_none());
    }

    #[tokio::test]
    async fn located_rows_are_not_geocoded_again() {
        let store = InMemoryStore::new();
        let mut event = Event::create(user("organizer-1"), upcoming_details()).unwrap();
        event.set_coordinates(1.0, 2.0);
        EventRepository::save(&store, &event).await.unwrap();

        let geocoder = Arc::new(MockGeocoder::new("google").with_default(daytona()));
        let handler = BackfillCoordinatesHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            geocoder.clone(),
        );

        let report = handler.handle(&admin()).await.unwrap();
        assert_eq!(report, BackfillReport::default());
        assert_eq!(geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn requires_admin() {
        let store = InMemoryStore::new();
        let handler = BackfillCoordinatesHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(MockGeocoder::new("google")),
        );
        let err = handler.handle(&competitor("fan-1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
