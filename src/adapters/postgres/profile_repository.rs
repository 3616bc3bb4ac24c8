//! PostgreSQL implementation of ProfileRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::account::UserProfile;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::ProfileRepository;

use super::rows::{is_unique_violation, parse_column};

pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: String,
    email: String,
    display_name: Option<String>,
    phone: Option<String>,
    company_name: Option<String>,
    account_type: String,
    verification_status: String,
    approval_status: String,
    is_active: bool,
    payment_customer_id: Option<String>,
    subscription_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = DomainError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            id: parse_column("id", &row.id)?,
            email: row.email,
            display_name: row.display_name,
            phone: row.phone,
            company_name: row.company_name,
            account_type: parse_column("account_type", &row.account_type)?,
            verification_status: parse_column("verification_status", &row.verification_status)?,
            approval_status: parse_column("approval_status", &row.approval_status)?,
            is_active: row.is_active,
            payment_customer_id: row.payment_customer_id,
            subscription_id: row.subscription_id,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_PROFILE: &str = r#"
    SELECT id, email, display_name, phone, company_name, account_type,
           verification_status, approval_status, is_active, payment_customer_id,
           subscription_id, created_at, updated_at
    FROM profiles
"#;

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, email, display_name, phone, company_name, account_type,
                verification_status, approval_status, is_active, payment_customer_id,
                subscription_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(profile.id.as_str())
        .bind(&profile.email)
        .bind(&profile.display_name)
        .bind(&profile.phone)
        .bind(&profile.company_name)
        .bind(profile.account_type.as_str())
        .bind(profile.verification_status.as_str())
        .bind(profile.approval_status.as_str())
        .bind(profile.is_active)
        .bind(&profile.payment_customer_id)
        .bind(&profile.subscription_id)
        .bind(profile.created_at.as_datetime())
        .bind(profile.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return DomainError::new(
                    ErrorCode::Conflict,
                    format!("Profile already exists: {}", profile.id),
                );
            }
            DomainError::database("Failed to save profile", e)
        })?;

        Ok(())
    }

    async fn update(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                email = $2, display_name = $3, phone = $4, company_name = $5,
                account_type = $6, verification_status = $7, approval_status = $8,
                is_active = $9, payment_customer_id = $10, subscription_id = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(profile.id.as_str())
        .bind(&profile.email)
        .bind(&profile.display_name)
        .bind(&profile.phone)
        .bind(&profile.company_name)
        .bind(profile.account_type.as_str())
        .bind(profile.verification_status.as_str())
        .bind(profile.approval_status.as_str())
        .bind(profile.is_active)
        .bind(&profile.payment_customer_id)
        .bind(&profile.subscription_id)
        .bind(profile.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update profile", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ProfileNotFound,
                format!("Profile not found: {}", profile.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_PROFILE))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch profile", e))?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn list_pending_approval(&self) -> Result<Vec<UserProfile>, DomainError> {
        let rows: Vec<ProfileRow> = sqlx::query_as(&format!(
            "{} WHERE approval_status = 'pending' ORDER BY created_at ASC",
            SELECT_PROFILE
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list pending profiles", e))?;

        rows.into_iter().map(UserProfile::try_from).collect()
    }
}
