//! PostgreSQL implementation of SupportTicketRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, TicketId, Timestamp, UserId};
use crate::domain::support::SupportTicket;
use crate::ports::SupportTicketRepository;

use super::rows::{parse_column, parse_optional};

pub struct PostgresSupportTicketRepository {
    pool: PgPool,
}

impl PostgresSupportTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    user_id: Option<String>,
    user_email: String,
    subject: String,
    description: String,
    priority: String,
    category: Option<String>,
    attachments: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<TicketRow> for SupportTicket {
    type Error = DomainError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(SupportTicket {
            id: TicketId::from_uuid(row.id),
            user_id: parse_optional("user_id", row.user_id.as_deref())?,
            user_email: row.user_email,
            subject: row.subject,
            description: row.description,
            priority: parse_column("priority", &row.priority)?,
            category: row.category,
            attachments: row.attachments,
            status: parse_column("status", &row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            resolved_at: row.resolved_at.map(Timestamp::from_datetime),
        })
    }
}

const SELECT_TICKET: &str = r#"
    SELECT id, user_id, user_email, subject, description, priority, category,
           attachments, status, created_at, updated_at, resolved_at
    FROM support_tickets
"#;

#[async_trait]
impl SupportTicketRepository for PostgresSupportTicketRepository {
    async fn save(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO support_tickets (
                id, user_id, user_email, subject, description, priority, category,
                attachments, status, created_at, updated_at, resolved_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(ticket.id.as_uuid())
        .bind(ticket.user_id.as_ref().map(|u| u.as_str()))
        .bind(&ticket.user_email)
        .bind(&ticket.subject)
        .bind(&ticket.description)
        .bind(ticket.priority.as_str())
        .bind(&ticket.category)
        .bind(&ticket.attachments)
        .bind(ticket.status.as_str())
        .bind(ticket.created_at.as_datetime())
        .bind(ticket.updated_at.as_datetime())
        .bind(ticket.resolved_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save support ticket", e))?;

        Ok(())
    }

    async fn update(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE support_tickets SET
                priority = $2, category = $3, status = $4, updated_at = $5, resolved_at = $6
            WHERE id = $1
            "#,
        )
        .bind(ticket.id.as_uuid())
        .bind(ticket.priority.as_str())
        .bind(&ticket.category)
        .bind(ticket.status.as_str())
        .bind(ticket.updated_at.as_datetime())
        .bind(ticket.resolved_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update support ticket", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Support ticket not found: {}", ticket.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<SupportTicket>, DomainError> {
        let row: Option<TicketRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_TICKET))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch support ticket", e))?;

        row.map(SupportTicket::try_from).transpose()
    }

    async fn list(&self, reporter: Option<&UserId>) -> Result<Vec<SupportTicket>, DomainError> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "{} WHERE ($1::text IS NULL OR user_id = $1) ORDER BY created_at DESC",
            SELECT_TICKET
        ))
        .bind(reporter.map(|u| u.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list support tickets", e))?;

        rows.into_iter().map(SupportTicket::try_from).collect()
    }
}
