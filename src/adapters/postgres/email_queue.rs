//! PostgreSQL implementation of EmailQueue.
//!
//! Claiming uses `FOR UPDATE SKIP LOCKED` so several pollers can drain the
//! queue without double-sending.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::email::{EmailMessage, QueuedEmail, ATTEMPTS_EXHAUSTED};
use crate::domain::foundation::{DomainError, EmailId, ErrorCode, Timestamp};
use crate::ports::EmailQueue;

use super::rows::{parse_column, to_i32, to_u32};

pub struct PostgresEmailQueue {
    pool: PgPool,
}

impl PostgresEmailQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EmailRow {
    id: Uuid,
    to_address: String,
    subject: String,
    html_body: String,
    text_body: Option<String>,
    template: Option<String>,
    status: String,
    attempts: i32,
    last_error: Option<String>,
    provider: Option<String>,
    provider_message_id: Option<String>,
    scheduled_at: DateTime<Utc>,
    sent_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EmailRow> for QueuedEmail {
    type Error = DomainError;

    fn try_from(row: EmailRow) -> Result<Self, Self::Error> {
        Ok(QueuedEmail {
            id: EmailId::from_uuid(row.id),
            message: EmailMessage {
                to: row.to_address,
                subject: row.subject,
                html_body: row.html_body,
                text_body: row.text_body,
                template: row.template,
            },
            status: parse_column("status", &row.status)?,
            attempts: to_u32("attempts", row.attempts)?,
            last_error: row.last_error,
            provider: row.provider,
            provider_message_id: row.provider_message_id,
            scheduled_at: Timestamp::from_datetime(row.scheduled_at),
            sent_at: row.sent_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const EMAIL_COLUMNS: &str = r#"
    id, to_address, subject, html_body, text_body, template, status, attempts,
    last_error, provider, provider_message_id, scheduled_at, sent_at, created_at, updated_at
"#;

#[async_trait]
impl EmailQueue for PostgresEmailQueue {
    async fn enqueue(&self, email: &QueuedEmail) -> Result<(), DomainError> {
        let message = &email.message;
        sqlx::query(&format!(
            "INSERT INTO email_queue ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
            EMAIL_COLUMNS
        ))
        .bind(email.id.as_uuid())
        .bind(&message.to)
        .bind(&message.subject)
        .bind(&message.html_body)
        .bind(&message.text_body)
        .bind(&message.template)
        .bind(email.status.as_str())
        .bind(to_i32("attempts", email.attempts)?)
        .bind(&email.last_error)
        .bind(&email.provider)
        .bind(&email.provider_message_id)
        .bind(email.scheduled_at.as_datetime())
        .bind(email.sent_at.map(|t| *t.as_datetime()))
        .bind(email.created_at.as_datetime())
        .bind(email.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to enqueue email", e))?;

        Ok(())
    }

    async fn claim_due(
        &self,
        now: Timestamp,
        lease_until: Timestamp,
        limit: u32,
        max_attempts: u32,
    ) -> Result<Vec<QueuedEmail>, DomainError> {
        // The CTE and the claim see the same snapshot and touch disjoint rows.
        let sql = format!(
            r#"
            WITH exhausted AS (
                UPDATE email_queue SET
                    status = 'failed',
                    last_error = $5,
                    updated_at = $1
                WHERE status = 'pending' AND scheduled_at <= $1 AND attempts >= $4
            )
            UPDATE email_queue SET
                attempts = attempts + 1,
                scheduled_at = $2,
                updated_at = $1
            WHERE id IN (
                SELECT id FROM email_queue
                WHERE status = 'pending' AND scheduled_at <= $1 AND attempts < $4
                ORDER BY scheduled_at ASC
                LIMIT $3
                FOR UPDATE SKIP LOCKED
            )
            RETURNING {}
            "#,
            EMAIL_COLUMNS
        );
        let mut rows: Vec<EmailRow> = sqlx::query_as(&sql)
            .bind(now.as_datetime())
            .bind(lease_until.as_datetime())
            .bind(i64::from(limit))
            .bind(to_i32("max_attempts", max_attempts)?)
            .bind(ATTEMPTS_EXHAUSTED)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to claim emails", e))?;

        // RETURNING does not preserve the subquery order.
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        rows.into_iter().map(QueuedEmail::try_from).collect()
    }

    async fn update(&self, email: &QueuedEmail) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE email_queue SET
                status = $2, attempts = $3, last_error = $4, provider = $5,
                provider_message_id = $6, scheduled_at = $7, sent_at = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(email.id.as_uuid())
        .bind(email.status.as_str())
        .bind(to_i32("attempts", email.attempts)?)
        .bind(&email.last_error)
        .bind(&email.provider)
        .bind(&email.provider_message_id)
        .bind(email.scheduled_at.as_datetime())
        .bind(email.sent_at.map(|t| *t.as_datetime()))
        .bind(email.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update email", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Queued email not found: {}", email.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &EmailId) -> Result<Option<QueuedEmail>, DomainError> {
        let row: Option<EmailRow> = sqlx::query_as(&format!(
            "SELECT {} FROM email_queue WHERE id = $1",
            EMAIL_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch email", e))?;

        row.map(QueuedEmail::try_from).transpose()
    }
}
