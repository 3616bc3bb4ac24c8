//! PostgreSQL implementation of EventRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::event::{Event, EventDetails, EventStatus};
use crate::domain::foundation::{DomainError, ErrorCode, EventId, Timestamp};
use crate::ports::{EventFilter, EventRepository};

use super::rows::{parse_column, to_i32, to_u32};

pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    organizer_id: String,
    name: String,
    event_type: String,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    location: String,
    venue_name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    max_competitors: i32,
    regular_price_cents: i64,
    early_bird_price_cents: Option<i64>,
    early_bird_deadline: Option<NaiveDate>,
    status: String,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = DomainError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            id: EventId::from_uuid(row.id),
            organizer_id: parse_column("organizer_id", &row.organizer_id)?,
            details: EventDetails {
                name: row.name,
                event_type: parse_column("event_type", &row.event_type)?,
                description: row.description,
                start_date: row.start_date,
                end_date: row.end_date,
                location: row.location,
                venue_name: row.venue_name,
                max_competitors: to_u32("max_competitors", row.max_competitors)?,
                regular_price_cents: row.regular_price_cents,
                early_bird_price_cents: row.early_bird_price_cents,
                early_bird_deadline: row.early_bird_deadline,
            },
            latitude: row.latitude,
            longitude: row.longitude,
            status: parse_column("status", &row.status)?,
            rejection_reason: row.rejection_reason,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_EVENT: &str = r#"
    SELECT id, organizer_id, name, event_type, description, start_date, end_date,
           location, venue_name, latitude, longitude, max_competitors,
           regular_price_cents, early_bird_price_cents, early_bird_deadline,
           status, rejection_reason, created_at, updated_at
    FROM events
"#;

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn save(&self, event: &Event) -> Result<(), DomainError> {
        let d = &event.details;
        sqlx::query(
            r#"
            INSERT INTO events (
                id, organizer_id, name, event_type, description, start_date, end_date,
                location, venue_name, latitude, longitude, max_competitors,
                regular_price_cents, early_bird_price_cents, early_bird_deadline,
                status, rejection_reason, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(event.id.as_uuid())
        .bind(event.organizer_id.as_str())
        .bind(&d.name)
        .bind(d.event_type.as_str())
        .bind(&d.description)
        .bind(d.start_date)
        .bind(d.end_date)
        .bind(&d.location)
        .bind(&d.venue_name)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(to_i32("max_competitors", d.max_competitors)?)
        .bind(d.regular_price_cents)
        .bind(d.early_bird_price_cents)
        .bind(d.early_bird_deadline)
        .bind(event.status.as_str())
        .bind(&event.rejection_reason)
        .bind(event.created_at.as_datetime())
        .bind(event.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save event", e))?;

        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), DomainError> {
        let d = &event.details;
        let result = sqlx::query(
            r#"
            UPDATE events SET
                name = $2, event_type = $3, description = $4, start_date = $5, end_date = $6,
                location = $7, venue_name = $8, latitude = $9, longitude = $10,
                max_competitors = $11, regular_price_cents = $12, early_bird_price_cents = $13,
                early_bird_deadline = $14, status = $15, rejection_reason = $16, updated_at = $17
            WHERE id = $1
            "#,
        )
        .bind(event.id.as_uuid())
        .bind(&d.name)
        .bind(d.event_type.as_str())
        .bind(&d.description)
        .bind(d.start_date)
        .bind(d.end_date)
        .bind(&d.location)
        .bind(&d.venue_name)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(to_i32("max_competitors", d.max_competitors)?)
        .bind(d.regular_price_cents)
        .bind(d.early_bird_price_cents)
        .bind(d.early_bird_deadline)
        .bind(event.status.as_str())
        .bind(&event.rejection_reason)
        .bind(event.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update event", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::EventNotFound,
                format!("Event not found: {}", event.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, DomainError> {
        let row: Option<EventRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_EVENT))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch event", e))?;

        row.map(Event::try_from).transpose()
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, DomainError> {
        let sql = format!(
            r#"{}
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR event_type = $2)
              AND ($3::date IS NULL OR start_date >= $3)
              AND ($4::text IS NULL OR organizer_id = $4)
            ORDER BY start_date ASC, created_at ASC
            LIMIT $5
            "#,
            SELECT_EVENT
        );

        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(filter.status.map(|s: EventStatus| s.as_str()))
            .bind(filter.event_type.map(|t| t.as_str()))
            .bind(filter.starts_on_or_after)
            .bind(filter.organizer_id.as_ref().map(|o| o.as_str()))
            .bind(i64::from(filter.limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list events", e))?;

        rows.into_iter().map(Event::try_from).collect()
    }
}
