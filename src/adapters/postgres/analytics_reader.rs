//! PostgreSQL implementation of AnalyticsReader.
//!
//! Aggregates run in SQL. Window bounds are bound as nullable timestamps so
//! one statement serves both bounded and open reports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::analytics::{AttendanceStats, RegistrationStats, RevenueStats, TimeWindow};
use crate::domain::foundation::{DomainError, EventId};
use crate::ports::AnalyticsReader;

pub struct PostgresAnalyticsReader {
    pool: PgPool,
}

impl PostgresAnalyticsReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bounds(window: &TimeWindow) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    (
        window.from.map(|t| *t.as_datetime()),
        window.to.map(|t| *t.as_datetime()),
    )
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[async_trait]
impl AnalyticsReader for PostgresAnalyticsReader {
    async fn registration_stats(
        &self,
        event_id: Option<&EventId>,
        window: &TimeWindow,
    ) -> Result<RegistrationStats, DomainError> {
        let (from, to) = bounds(window);
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT category, COUNT(*)
            FROM registrations
            WHERE ($1::uuid IS NULL OR event_id = $1)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            GROUP BY category
            "#,
        )
        .bind(event_id.map(|id| *id.as_uuid()))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to aggregate registrations", e))?;

        let mut stats = RegistrationStats::default();
        for (category, count) in rows {
            let count = to_count(count);
            stats.total += count;
            stats.by_category.insert(category, count);
        }
        Ok(stats)
    }

    async fn revenue_stats(
        &self,
        event_id: Option<&EventId>,
        window: &TimeWindow,
    ) -> Result<RevenueStats, DomainError> {
        let (from, to) = bounds(window);
        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            r#"
            SELECT p.currency,
                   COALESCE(SUM(p.amount_cents - p.refunded_cents), 0)::BIGINT,
                   COUNT(*)
            FROM payments p
            JOIN registrations r ON r.id = p.registration_id
            WHERE p.status IN ('succeeded', 'partially_refunded', 'refunded')
              AND ($1::uuid IS NULL OR r.event_id = $1)
              AND ($2::timestamptz IS NULL OR p.created_at >= $2)
              AND ($3::timestamptz IS NULL OR p.created_at <= $3)
            GROUP BY p.currency
            "#,
        )
        .bind(event_id.map(|id| *id.as_uuid()))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to aggregate revenue", e))?;

        let mut stats = RevenueStats::default();
        for (currency, net_cents, count) in rows {
            stats.total_cents += net_cents;
            stats.transaction_count += to_count(count);
            stats.by_currency.insert(currency, net_cents);
        }
        Ok(stats)
    }

    async fn attendance_stats(
        &self,
        event_id: Option<&EventId>,
        window: &TimeWindow,
    ) -> Result<AttendanceStats, DomainError> {
        let (from, to) = bounds(window);
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM event_check_ins
            WHERE ($1::uuid IS NULL OR event_id = $1)
              AND ($2::timestamptz IS NULL OR checked_in_at >= $2)
              AND ($3::timestamptz IS NULL OR checked_in_at <= $3)
            "#,
        )
        .bind(event_id.map(|id| *id.as_uuid()))
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to count check-ins", e))?;

        Ok(AttendanceStats {
            check_ins: to_count(count),
        })
    }
}
