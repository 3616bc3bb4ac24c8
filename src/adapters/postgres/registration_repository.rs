//! PostgreSQL implementation of RegistrationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    CheckInId, DomainError, ErrorCode, EventId, RegistrationId, Timestamp, UserId,
};
use crate::domain::registration::{CheckIn, CompetitorEntry, Registration};
use crate::ports::{RegistrationFilter, RegistrationRepository};

use super::rows::{is_unique_violation, parse_column};

/// Statuses that hold a competitor slot, mirrored in the partial unique index.
const ACTIVE_STATUSES: &str = "('pending_payment', 'confirmed', 'approved')";

pub struct PostgresRegistrationRepository {
    pool: PgPool,
}

impl PostgresRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RegistrationRow {
    id: Uuid,
    event_id: Uuid,
    user_id: String,
    competitor_name: String,
    email: String,
    phone: Option<String>,
    vehicle_info: Value,
    category: String,
    team_name: Option<String>,
    amount_due_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = DomainError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        Ok(Registration {
            id: RegistrationId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            user_id: parse_column("user_id", &row.user_id)?,
            entry: CompetitorEntry {
                competitor_name: row.competitor_name,
                email: row.email,
                phone: row.phone,
                vehicle_info: row.vehicle_info,
                category: row.category,
                team_name: row.team_name,
            },
            amount_due_cents: row.amount_due_cents,
            status: parse_column("status", &row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CheckInRow {
    id: Uuid,
    event_id: Uuid,
    registration_id: Uuid,
    checked_in_by: String,
    checked_in_at: DateTime<Utc>,
}

impl TryFrom<CheckInRow> for CheckIn {
    type Error = DomainError;

    fn try_from(row: CheckInRow) -> Result<Self, Self::Error> {
        Ok(CheckIn {
            id: CheckInId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            registration_id: RegistrationId::from_uuid(row.registration_id),
            checked_in_by: parse_column("checked_in_by", &row.checked_in_by)?,
            checked_in_at: Timestamp::from_datetime(row.checked_in_at),
        })
    }
}

const SELECT_REGISTRATION: &str = r#"
    SELECT id, event_id, user_id, competitor_name, email, phone, vehicle_info,
           category, team_name, amount_due_cents, status, created_at, updated_at
    FROM registrations
"#;

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepository {
    async fn save(&self, registration: &Registration) -> Result<(), DomainError> {
        let entry = &registration.entry;
        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, event_id, user_id, competitor_name, email, phone, vehicle_info,
                category, team_name, amount_due_cents, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(registration.id.as_uuid())
        .bind(registration.event_id.as_uuid())
        .bind(registration.user_id.as_str())
        .bind(&entry.competitor_name)
        .bind(&entry.email)
        .bind(&entry.phone)
        .bind(&entry.vehicle_info)
        .bind(&entry.category)
        .bind(&entry.team_name)
        .bind(registration.amount_due_cents)
        .bind(registration.status.as_str())
        .bind(registration.created_at.as_datetime())
        .bind(registration.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return DomainError::new(
                    ErrorCode::AlreadyRegistered,
                    "Already registered for this event",
                );
            }
            DomainError::database("Failed to save registration", e)
        })?;

        Ok(())
    }

    async fn update(&self, registration: &Registration) -> Result<(), DomainError> {
        let entry = &registration.entry;
        let result = sqlx::query(
            r#"
            UPDATE registrations SET
                competitor_name = $2, email = $3, phone = $4, vehicle_info = $5,
                category = $6, team_name = $7, amount_due_cents = $8, status = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(registration.id.as_uuid())
        .bind(&entry.competitor_name)
        .bind(&entry.email)
        .bind(&entry.phone)
        .bind(&entry.vehicle_info)
        .bind(&entry.category)
        .bind(&entry.team_name)
        .bind(registration.amount_due_cents)
        .bind(registration.status.as_str())
        .bind(registration.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update registration", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::RegistrationNotFound,
                format!("Registration not found: {}", registration.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &RegistrationId) -> Result<Option<Registration>, DomainError> {
        let row: Option<RegistrationRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_REGISTRATION))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to fetch registration", e))?;

        row.map(Registration::try_from).transpose()
    }

    async fn find_active(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<Option<Registration>, DomainError> {
        let sql = format!(
            "{} WHERE event_id = $1 AND user_id = $2 AND status IN {}",
            SELECT_REGISTRATION, ACTIVE_STATUSES
        );
        let row: Option<RegistrationRow> = sqlx::query_as(&sql)
            .bind(event_id.as_uuid())
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch registration", e))?;

        row.map(Registration::try_from).transpose()
    }

    async fn list(&self, filter: &RegistrationFilter) -> Result<Vec<Registration>, DomainError> {
        let sql = format!(
            r#"{}
            WHERE ($1::uuid IS NULL OR event_id = $1)
              AND ($2::text IS NULL OR user_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY created_at ASC, id ASC
            "#,
            SELECT_REGISTRATION
        );
        let rows: Vec<RegistrationRow> = sqlx::query_as(&sql)
            .bind(filter.event_id.map(|id| *id.as_uuid()))
            .bind(filter.user_id.as_ref().map(|u| u.as_str()))
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list registrations", e))?;

        rows.into_iter().map(Registration::try_from).collect()
    }

    async fn count_active(&self, event_id: &EventId) -> Result<u32, DomainError> {
        let sql = format!(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status IN {}",
            ACTIVE_STATUSES
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(event_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to count registrations", e))?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn record_check_in(&self, check_in: &CheckIn) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO event_check_ins (id, event_id, registration_id, checked_in_by, checked_in_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(check_in.id.as_uuid())
        .bind(check_in.event_id.as_uuid())
        .bind(check_in.registration_id.as_uuid())
        .bind(check_in.checked_in_by.as_str())
        .bind(check_in.checked_in_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return DomainError::new(
                    ErrorCode::AlreadyCheckedIn,
                    "Registration is already checked in",
                );
            }
            DomainError::database("Failed to record check-in", e)
        })?;

        Ok(())
    }

    async fn find_check_in(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Option<CheckIn>, DomainError> {
        let row: Option<CheckInRow> = sqlx::query_as(
            r#"
            SELECT id, event_id, registration_id, checked_in_by, checked_in_at
            FROM event_check_ins
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch check-in", e))?;

        row.map(CheckIn::try_from).transpose()
    }
}
