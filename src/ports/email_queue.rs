//! Persistent outbound email queue port.

use async_trait::async_trait;

use crate::domain::email::QueuedEmail;
use crate::domain::foundation::{DomainError, EmailId, Timestamp};

#[async_trait]
pub trait EmailQueue: Send + Sync {
    async fn enqueue(&self, email: &QueuedEmail) -> Result<(), DomainError>;

    /// Claims up to `limit` pending emails due at `now`, oldest schedule first.
    ///
    /// Claiming counts one attempt and pushes `scheduled_at` past `lease_until`
    /// so a concurrent claimer skips the rows. Must be a single statement.
    ///
    /// Due rows that already used `max_attempts` are marked failed instead of
    /// claimed. A run that dies before recording its outcome still spends an
    /// attempt, so such rows would otherwise be reclaimed forever.
    async fn claim_due(
        &self,
        now: Timestamp,
        lease_until: Timestamp,
        limit: u32,
        max_attempts: u32,
    ) -> Result<Vec<QueuedEmail>, DomainError>;

    /// Persists the outcome of a delivery attempt.
    async fn update(&self, email: &QueuedEmail) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &EmailId) -> Result<Option<QueuedEmail>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_queue_is_object_safe() {
        fn _accepts_dyn(_queue: &dyn EmailQueue) {}
    }
}
