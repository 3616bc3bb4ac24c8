//! PostgreSQL implementation of AuditLog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{AuditEntryId, DomainError, Timestamp};
use crate::ports::AuditLog;

use super::rows::parse_column;

pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    actor_id: String,
    action: String,
    entity_type: String,
    entity_id: String,
    details: Value,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditRow> for AuditEntry {
    type Error = DomainError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        Ok(AuditEntry {
            id: AuditEntryId::from_uuid(row.id),
            actor_id: parse_column("actor_id", &row.actor_id)?,
            action: parse_column("action", &row.action)?,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            details: row.details,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    async fn record(&self, entry: &AuditEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, actor_id, action, entity_type, entity_id, details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.actor_id.as_str())
        .bind(entry.action.as_str())
        .bind(&entry.entity_type)
        .bind(&entry.entity_id)
        .bind(&entry.details)
        .bind(entry.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to record audit entry", e))?;

        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError> {
        let rows: Vec<AuditRow> = sqlx::query_as(
            r#"
            SELECT id, actor_id, action, entity_type, entity_id, details, created_at
            FROM audit_log
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list audit entries", e))?;

        rows.into_iter().map(AuditEntry::try_from).collect()
    }
}
