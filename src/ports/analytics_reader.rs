//! Read-side port for event analytics.
//!
//! Each query is scoped to one event when `event_id` is set, or to every event
//! otherwise. The window applies to `created_at` for registrations and payments
//! and to `checked_in_at` for check-ins.

use async_trait::async_trait;

use crate::domain::analytics::{AttendanceStats, RegistrationStats, RevenueStats, TimeWindow};
use crate::domain::foundation::{DomainError, EventId};

#[async_trait]
pub trait AnalyticsReader: Send + Sync {
    async fn registration_stats(
        &self,
        event_id: Option<&EventId>,
        window: &TimeWindow,
    ) -> Result<RegistrationStats, DomainError>;

    /// Collected payments net of refunds.
    async fn revenue_stats(
        &self,
        event_id: Option<&EventId>,
        window: &TimeWindow,
    ) -> Result<RevenueStats, DomainError>;

    async fn attendance_stats(
        &self,
        event_id: Option<&EventId>,
        window: &TimeWindow,
    ) -> Result<AttendanceStats, DomainError>;
}
