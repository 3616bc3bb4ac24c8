use std::sync::Arc;

use crate::application::handlers::events::load_managed_event;
use crate::application::Actor;
use crate::domain::analytics::{AnalyticsQuery, EventAnalytics, Metric};
use crate::domain::foundation::DomainError;
use crate::ports::{AnalyticsReader, EventRepository};

#[derive(Debug, Clone)]
pub struct GetEventAnalyticsQuery {
    pub actor: Actor,
    pub query: AnalyticsQuery,
}

/// Reports the requested metrics for one event, or across all events.
///
/// The cross-event report is admin only. An event report is open to admins
/// and the event's organizer.
pub struct GetEventAnalyticsHandler {
    events: Arc<dyn EventRepository>,
    reader: Arc<dyn AnalyticsReader>,
}

impl GetEventAnalyticsHandler {
    pub fn new(events: Arc<dyn EventRepository>, reader: Arc<dyn AnalyticsReader>) -> Self {
        Self { events, reader }
    }

    pub async fn handle(&self, query: GetEventAnalyticsQuery) -> Result<EventAnalytics, DomainError> {
        let GetEventAnalyticsQuery { actor, query } = query;

        // 1. Access
        match &query.event_id {
            Some(event_id) => {
                load_managed_event(self.events.as_ref(), &actor, event_id).await?;
            }
            None => actor.ensure_admin()?,
        }

        // 2. Requested metrics only
        let event_id = query.event_id.as_ref();
        let window = query.window();
        let mut report = EventAnalytics::empty(&query);
        if query.includes(Metric::Registrations) {
            report.registrations = Some(self.reader.registration_stats(event_id, &window).await?);
        }
        if query.includes(Metric::Revenue) {
            report.revenue = Some(self.reader.revenue_stats(event_id, &window).await?);
        }
        if query.includes(Metric::Attendance) {
            report.attendance = Some(self.reader.attendance_stats(event_id, &window).await?);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{
        admin, competitor, organizer, published_event, upcoming_details,
    };
    use crate::domain::event::Event;
    use crate::domain::foundation::{ErrorCode, EventId, Money, Timestamp, UserId};
    use crate::domain::payment::{Payment, PaymentStatus};
    use crate::domain::registration::{sample_entry, CheckIn, Registration};
    use crate::ports::{PaymentRepository, RegistrationRepository};
    use chrono::NaiveDate;

    fn query(actor: Actor, event_id: Option<EventId>, metrics: Vec<Metric>) -> GetEventAnalyticsQuery {
        GetEventAnalyticsQuery {
            actor,
            query: AnalyticsQuery::new(event_id, None, None, metrics).unwrap(),
        }
    }

    fn handler(store: &InMemoryStore) -> GetEventAnalyticsHandler {
        GetEventAnalyticsHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn organizer_gets_only_requested_metrics() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;

        let report = handler(&store)
            .handle(query(organizer(), Some(event.id), vec![Metric::Revenue]))
            .await
            .unwrap();
        assert_eq!(report.revenue.unwrap().total_cents, 0);
        assert!(report.registrations.is_none());
        assert!(report.attendance.is_none());
    }

    #[tokio::test]
    async fn other_users_are_forbidden() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;

        let err = handler(&store)
            .handle(query(competitor("fan-1"), Some(event.id), vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn cross_event_report_is_admin_only() {
        let store = InMemoryStore::new();
        let err = handler(&store)
            .handle(query(organizer(), None, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let report = handler(&store).handle(query(admin(), None, vec![])).await.unwrap();
        assert_eq!(report.registrations.unwrap().total, 0);
        assert_eq!(report.attendance.unwrap().check_ins, 0);
    }

    fn day(m: u32, d: u32) -> Timestamp {
        Timestamp::start_of(NaiveDate::from_ymd_opt(2026, m, d).unwrap())
    }

    async fn registration(
        store: &InMemoryStore,
        event: &Event,
        user_id: &str,
        category: &str,
        at: Timestamp,
    ) -> Registration {
        let mut entry = sample_entry();
        entry.category = category.to_string();
        let registration =
            Registration::create(event, UserId::new(user_id).unwrap(), entry, at).unwrap();
        RegistrationRepository::save(store, &registration).await.unwrap();
        registration
    }

    async fn payment(
        store: &InMemoryStore,
        registration: &Registration,
        cents: i64,
        currency: &str,
        settled: bool,
        at: Timestamp,
    ) -> Payment {
        let mut payment = Payment::create(
            registration.id,
            registration.user_id.clone(),
            Money::new(cents, currency).unwrap(),
            format!("pi_{}_{}", registration.id, cents),
        );
        if settled {
            payment.mark_succeeded().unwrap();
        }
        payment.created_at = at;
        PaymentRepository::save(store, &payment).await.unwrap();
        payment
    }

    async fn check_in(store: &InMemoryStore, registration: &Registration, at: Timestamp) {
        let mut check_in = CheckIn::record(registration, UserId::new("organizer-1").unwrap());
        check_in.checked_in_at = at;
        store.record_check_in(&check_in).await.unwrap();
    }

    #[tokio::test]
    async fn figures_cover_one_event_within_the_window() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        let other = published_event(&store, upcoming_details()).await;
        let (inside, outside) = (day(3, 10), day(1, 5));

        let street = registration(&store, &event, "fan-1", "street-2", inside).await;
        let modified = registration(&store, &event, "fan-2", "modified", inside).await;
        let early = registration(&store, &event, "fan-3", "street-2", outside).await;
        let elsewhere = registration(&store, &other, "fan-4", "street-2", inside).await;

        // Partially refunded: counts net of the refund.
        let mut refunded = payment(&store, &street, 5_000, "usd", true, inside).await;
        refunded.apply_refund(1_500).unwrap();
        assert_eq!(refunded.status, PaymentStatus::PartiallyRefunded);
        PaymentRepository::update(&store, &refunded).await.unwrap();

        payment(&store, &modified, 4_000, "cad", true, inside).await;
        // Never collected.
        payment(&store, &modified, 2_000, "usd", false, inside).await;
        // Outside the window.
        payment(&store, &early, 3_000, "usd", true, outside).await;
        // Another event.
        payment(&store, &elsewhere, 7_000, "usd", true, inside).await;

        check_in(&store, &street, inside).await;
        check_in(&store, &early, outside).await;
        check_in(&store, &elsewhere, inside).await;

        let report = handler(&store)
            .handle(GetEventAnalyticsQuery {
                actor: organizer(),
                query: AnalyticsQuery::new(
                    Some(event.id),
                    Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
                    Some(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()),
                    vec![],
                )
                .unwrap(),
            })
            .await
            .unwrap();

        let registrations = report.registrations.unwrap();
        assert_eq!(registrations.total, 2);
        assert_eq!(registrations.by_category.get("street-2"), Some(&1));
        assert_eq!(registrations.by_category.get("modified"), Some(&1));

        let revenue = report.revenue.unwrap();
        assert_eq!(revenue.transaction_count, 2);
        assert_eq!(revenue.by_currency.get("usd"), Some(&3_500));
        assert_eq!(revenue.by_currency.get("cad"), Some(&4_000));
        assert_eq!(revenue.total_cents, 7_500);

        assert_eq!(report.attendance.unwrap().check_ins, 1);
    }
}
