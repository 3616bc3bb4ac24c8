//! Email queue, audit trail, analytics and the health check over the shared tables.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::analytics::{AttendanceStats, RegistrationStats, RevenueStats, TimeWindow};
use crate::domain::audit::AuditEntry;
use crate::domain::email::{QueuedEmail, ATTEMPTS_EXHAUSTED};
use crate::domain::foundation::{DomainError, EmailId, ErrorCode, EventId, Timestamp};
use crate::ports::{AnalyticsReader, AuditLog, EmailQueue, HealthCheck};

use super::InMemoryStore;

#[async_trait]
impl EmailQueue for InMemoryStore {
    async fn enqueue(&self, email: &QueuedEmail) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .emails
            .insert(email.id, email.clone());
        Ok(())
    }

    async fn claim_due(
        &self,
        now: Timestamp,
        lease_until: Timestamp,
        limit: u32,
        max_attempts: u32,
    ) -> Result<Vec<QueuedEmail>, DomainError> {
        let mut tables = self.tables.write().await;
        let mut due = Vec::new();
        for email in tables.emails.values_mut().filter(|e| e.is_due(now)) {
            if email.attempts >= max_attempts {
                email.record_failure(ATTEMPTS_EXHAUSTED, max_attempts)?;
            } else {
                due.push(email);
            }
        }
        due.sort_by_key(|e| e.scheduled_at);

        let mut claimed = Vec::new();
        for email in due.into_iter().take(limit as usize) {
            email.claim();
            email.scheduled_at = lease_until;
            claimed.push(email.clone());
        }
        Ok(claimed)
    }

    async fn update(&self, email: &QueuedEmail) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.emails.get_mut(&email.id) {
            Some(stored) => {
                *stored = email.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Queued email not found: {}", email.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &EmailId) -> Result<Option<QueuedEmail>, DomainError> {
        Ok(self.tables.read().await.emails.get(id).cloned())
    }
}

#[async_trait]
impl AuditLog for InMemoryStore {
    async fn record(&self, entry: &AuditEntry) -> Result<(), DomainError> {
        self.tables.write().await.audit.push(entry.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError> {
        let tables = self.tables.read().await;
        // Insertion order breaks timestamp ties.
        let mut entries: Vec<AuditEntry> = tables.audit.iter().rev().cloned().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}

#[async_trait]
impl AnalyticsReader for InMemoryStore {
    async fn registration_stats(
        &self,
        event_id: Option<&EventId>,
        window: &TimeWindow,
    ) -> Result<RegistrationStats, DomainError> {
        let tables = self.tables.read().await;
        let mut stats = RegistrationStats::default();
        for registration in tables.registrations.values().filter(|r| {
            event_id.map_or(true, |e| &r.event_id == e) && window.contains(r.created_at)
        }) {
            stats.total += 1;
            *stats
                .by_category
                .entry(registration.entry.category.clone())
                .or_insert(0) += 1;
        }
        Ok(stats)
    }

    async fn revenue_stats(
        &self,
        event_id: Option<&EventId>,
        window: &TimeWindow,
    ) -> Result<RevenueStats, DomainError> {
        let tables = self.tables.read().await;
        let mut by_currency: BTreeMap<String, i64> = BTreeMap::new();
        let mut transaction_count = 0;
        for payment in tables.payments.values() {
            let in_event = match event_id {
                None => true,
                Some(event_id) => tables
                    .registrations
                    .get(&payment.registration_id)
                    .map_or(false, |r| &r.event_id == event_id),
            };
            if !in_event || !payment.status.is_collected() || !window.contains(payment.created_at) {
                continue;
            }
            transaction_count += 1;
            *by_currency.entry(payment.currency.clone()).or_insert(0) += payment.net_cents();
        }
        Ok(RevenueStats {
            total_cents: by_currency.values().sum(),
            transaction_count,
            by_currency,
        })
    }

    async fn attendance_stats(
        &self,
        event_id: Option<&EventId>,
        window: &TimeWindow,
    ) -> Result<AttendanceStats, DomainError> {
        let tables = self.tables.read().await;
        let check_ins = tables
            .check_ins
            .values()
            .filter(|c| {
                event_id.map_or(true, |e| &c.event_id == e) && window.contains(c.checked_in_at)
            })
            .count();
        Ok(AttendanceStats {
            check_ins: check_ins as u64,
        })
    }
}

#[async_trait]
impl HealthCheck for InMemoryStore {
    async fn database_ok(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::email::{EmailMessage, EmailStatus};
    use chrono::Duration;

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Registration confirmed".to_string(),
            html_body: "<p>See you at the lanes</p>".to_string(),
            text_body: None,
            template: None,
        }
    }

    #[tokio::test]
    async fn claim_counts_attempt_and_leases() {
        let store = InMemoryStore::new();
        let email = QueuedEmail::enqueue(message("a@example.com"), None);
        store.enqueue(&email).await.unwrap();

        let now = Timestamp::now();
        let lease = now.plus(Duration::minutes(5));
        let claimed = store.claim_due(now, lease, 10, 3).await.unwrap();
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].attempts, 1);

        // Leased rows are skipped by the next claimer.
        assert!(store.claim_due(now, lease, 10, 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn future_emails_are_not_due() {
        let store = InMemoryStore::new();
        let later = Timestamp::now().plus(Duration::hours(1));
        let email = QueuedEmail::enqueue(message("b@example.com"), Some(later));
        store.enqueue(&email).await.unwrap();

        let now = Timestamp::now();
        let claimed = store.claim_due(now, now, 10, 3).await.unwrap();
        assert!(claimed.is_empty());
        let stored = store.find_by_id(&email.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EmailStatus::Pending);
        assert_eq!(stored.attempts, 0);
    }

    #[tokio::test]
    async fn claim_respects_limit() {
        let store = InMemoryStore::new();
        for i in 0..3 {
            let email = QueuedEmail::enqueue(message(&format!("{}@example.com", i)), None);
            store.enqueue(&email).await.unwrap();
        }
        let now = Timestamp::now();
        let claimed = store
            .claim_due(now, now.plus(Duration::minutes(5)), 2, 3)
            .await
            .unwrap();
        assert_eq!(claimed.len(), 2);
    }

    #[tokio::test]
    async fn abandoned_leases_stop_at_max_attempts() {
        let store = InMemoryStore::new();
        let email = QueuedEmail::enqueue(message("c@example.com"), None);
        store.enqueue(&email).await.unwrap();

        // Each run claims and dies before recording an outcome, so the
        // lease expires with the row still pending.
        for attempt in 1..=3 {
            let now = Timestamp::now();
            let claimed = store.claim_due(now, now, 10, 3).await.unwrap();
            assert_eq!(claimed.len(), 1);
            assert_eq!(claimed[0].attempts, attempt);
        }

        let now = Timestamp::now();
        assert!(store.claim_due(now, now, 10, 3).await.unwrap().is_empty());
        let stored = store.find_by_id(&email.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EmailStatus::Failed);
        assert_eq!(stored.attempts, 3);
        assert_eq!(stored.last_error.as_deref(), Some(ATTEMPTS_EXHAUSTED));
    }
}
