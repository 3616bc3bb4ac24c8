//! PostgreSQL implementation of PaymentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, PaymentId, RefundId, RegistrationId, Timestamp,
};
use crate::domain::payment::{Payment, Refund};
use crate::ports::PaymentRepository;

use super::rows::{is_unique_violation, parse_column};

pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    registration_id: Uuid,
    user_id: String,
    amount_cents: i64,
    currency: String,
    provider_intent_id: String,
    status: String,
    refunded_cents: i64,
    failure_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            registration_id: RegistrationId::from_uuid(row.registration_id),
            user_id: parse_column("user_id", &row.user_id)?,
            amount_cents: row.amount_cents,
            currency: row.currency,
            provider_intent_id: row.provider_intent_id,
            status: parse_column("status", &row.status)?,
            refunded_cents: row.refunded_cents,
            failure_reason: row.failure_reason,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RefundRow {
    id: Uuid,
    payment_id: Uuid,
    amount_cents: i64,
    provider_refund_id: String,
    reason: Option<String>,
    requested_by: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<RefundRow> for Refund {
    type Error = DomainError;

    fn try_from(row: RefundRow) -> Result<Self, Self::Error> {
        Ok(Refund {
            id: RefundId::from_uuid(row.id),
            payment_id: PaymentId::from_uuid(row.payment_id),
            amount_cents: row.amount_cents,
            provider_refund_id: row.provider_refund_id,
            reason: row.reason,
            requested_by: parse_column("requested_by", &row.requested_by)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

const SELECT_PAYMENT: &str = r#"
    SELECT id, registration_id, user_id, amount_cents, currency, provider_intent_id,
           status, refunded_cents, failure_reason, created_at, updated_at
    FROM payments
"#;

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, registration_id, user_id, amount_cents, currency, provider_intent_id,
                status, refunded_cents, failure_reason, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.registration_id.as_uuid())
        .bind(payment.user_id.as_str())
        .bind(payment.amount_cents)
        .bind(&payment.currency)
        .bind(&payment.provider_intent_id)
        .bind(payment.status.as_str())
        .bind(payment.refunded_cents)
        .bind(&payment.failure_reason)
        .bind(payment.created_at.as_datetime())
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return DomainError::new(
                    ErrorCode::Conflict,
                    "Payment intent is already recorded",
                );
            }
            DomainError::database("Failed to save payment", e)
        })?;

        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                status = $2, refunded_cents = $3, failure_reason = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.status.as_str())
        .bind(payment.refunded_cents)
        .bind(&payment.failure_reason)
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update payment", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment not found: {}", payment.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_PAYMENT))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch payment", e))?;

        row.map(Payment::try_from).transpose()
    }

    async fn find_by_intent_id(&self, intent_id: &str) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "{} WHERE provider_intent_id = $1",
            SELECT_PAYMENT
        ))
        .bind(intent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch payment by intent", e))?;

        row.map(Payment::try_from).transpose()
    }

    async fn list_for_registration(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "{} WHERE registration_id = $1 ORDER BY created_at DESC",
            SELECT_PAYMENT
        ))
        .bind(registration_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list payments", e))?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn save_refund(&self, refund: &Refund) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO refunds (
                id, payment_id, amount_cents, provider_refund_id, reason, requested_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(refund.id.as_uuid())
        .bind(refund.payment_id.as_uuid())
        .bind(refund.amount_cents)
        .bind(&refund.provider_refund_id)
        .bind(&refund.reason)
        .bind(refund.requested_by.as_str())
        .bind(refund.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save refund", e))?;

        Ok(())
    }

    async fn list_refunds(&self, payment_id: &PaymentId) -> Result<Vec<Refund>, DomainError> {
        let rows: Vec<RefundRow> = sqlx::query_as(
            r#"
            SELECT id, payment_id, amount_cents, provider_refund_id, reason, requested_by, created_at
            FROM refunds
            WHERE payment_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(payment_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list refunds", e))?;

        rows.into_iter().map(Refund::try_from).collect()
    }
}
