//! Business directory persistence port.

use async_trait::async_trait;

use crate::domain::directory::{DirectoryListing, ListingCategory, ListingStatus};
use crate::domain::foundation::{DomainError, ListingId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub category: Option<ListingCategory>,
    pub status: Option<ListingStatus>,
    /// Only active listings.
    pub active_only: bool,
}

impl ListingFilter {
    /// What the public directory shows.
    pub fn public(category: Option<ListingCategory>) -> Self {
        Self {
            category,
            status: Some(ListingStatus::Approved),
            active_only: true,
        }
    }

    pub fn matches(&self, listing: &DirectoryListing) -> bool {
        self.category.map_or(true, |c| listing.details.category == c)
            && self.status.map_or(true, |s| listing.status == s)
            && (!self.active_only || listing.is_active)
    }
}

#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn save(&self, listing: &DirectoryListing) -> Result<(), DomainError>;

    async fn update(&self, listing: &DirectoryListing) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<DirectoryListing>, DomainError>;

    /// Listings ordered by business name.
    async fn list(&self, filter: &ListingFilter) -> Result<Vec<DirectoryListing>, DomainError>;
}
