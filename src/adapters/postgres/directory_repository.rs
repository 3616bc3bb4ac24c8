//! PostgreSQL implementation of DirectoryRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::directory::{DirectoryListing, ListingDetails};
use crate::domain::foundation::{DomainError, ErrorCode, ListingId, Timestamp};
use crate::ports::{DirectoryRepository, ListingFilter};

use super::rows::parse_column;

pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    owner_id: String,
    business_name: String,
    category: String,
    description: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    status: String,
    rejection_reason: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for DirectoryListing {
    type Error = DomainError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        Ok(DirectoryListing {
            id: ListingId::from_uuid(row.id),
            owner_id: parse_column("owner_id", &row.owner_id)?,
            details: ListingDetails {
                business_name: row.business_name,
                category: parse_column("category", &row.category)?,
                description: row.description,
                address: row.address,
                phone: row.phone,
                website: row.website,
            },
            latitude: row.latitude,
            longitude: row.longitude,
            status: parse_column("status", &row.status)?,
            rejection_reason: row.rejection_reason,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_LISTING: &str = r#"
    SELECT id, owner_id, business_name, category, description, address, phone, website,
           latitude, longitude, status, rejection_reason, is_active, created_at, updated_at
    FROM directory_listings
"#;

#[async_trait]
impl DirectoryRepository for PostgresDirectoryRepository {
    async fn save(&self, listing: &DirectoryListing) -> Result<(), DomainError> {
        let details = &listing.details;
        sqlx::query(
            r#"
            INSERT INTO directory_listings (
                id, owner_id, business_name, category, description, address, phone, website,
                latitude, longitude, status, rejection_reason, is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(listing.id.as_uuid())
        .bind(listing.owner_id.as_str())
        .bind(&details.business_name)
        .bind(details.category.as_str())
        .bind(&details.description)
        .bind(&details.address)
        .bind(&details.phone)
        .bind(&details.website)
        .bind(listing.latitude)
        .bind(listing.longitude)
        .bind(listing.status.as_str())
        .bind(&listing.rejection_reason)
        .bind(listing.is_active)
        .bind(listing.created_at.as_datetime())
        .bind(listing.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save listing", e))?;

        Ok(())
    }

    async fn update(&self, listing: &DirectoryListing) -> Result<(), DomainError> {
        let details = &listing.details;
        let result = sqlx::query(
            r#"
            UPDATE directory_listings SET
                business_name = $2, category = $3, description = $4, address = $5,
                phone = $6, website = $7, latitude = $8, longitude = $9, status = $10,
                rejection_reason = $11, is_active = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(listing.id.as_uuid())
        .bind(&details.business_name)
        .bind(details.category.as_str())
        .bind(&details.description)
        .bind(&details.address)
        .bind(&details.phone)
        .bind(&details.website)
        .bind(listing.latitude)
        .bind(listing.longitude)
        .bind(listing.status.as_str())
        .bind(&listing.rejection_reason)
        .bind(listing.is_active)
        .bind(listing.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update listing", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ListingNotFound,
                format!("Listing not found: {}", listing.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<DirectoryListing>, DomainError> {
        let row: Option<ListingRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_LISTING))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch listing", e))?;

        row.map(DirectoryListing::try_from).transpose()
    }

    async fn list(&self, filter: &ListingFilter) -> Result<Vec<DirectoryListing>, DomainError> {
        let sql = format!(
            r#"{}
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR status = $2)
              AND (NOT $3 OR is_active)
            ORDER BY business_name ASC
            "#,
            SELECT_LISTING
        );
        let rows: Vec<ListingRow> = sqlx::query_as(&sql)
            .bind(filter.category.map(|c| c.as_str()))
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list listings", e))?;

        rows.into_iter().map(DirectoryListing::try_from).collect()
    }
}
