use std::sync::Arc;

use serde_json::json;

use crate::application::side_effects::record_audit;
use crate::application::Actor;
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::directory::{DirectoryListing, ListingCategory, ListingDetails, ListingStatus};
use crate::domain::foundation::{DomainError, ErrorCode, ListingId};
use crate::ports::{AuditLog, DirectoryRepository, Geocoder, ListingFilter};

fn listing_not_found(id: &ListingId) -> DomainError {
    DomainError::new(ErrorCode::ListingNotFound, format!("Listing {} not found", id))
}

async fn load_listing(
    listings: &dyn DirectoryRepository,
    id: &ListingId,
) -> Result<DirectoryListing, DomainError> {
    listings
        .find_by_id(id)
        .await?
        .ok_or_else(|| listing_not_found(id))
}

#[derive(Debug, Clone)]
pub struct CreateListingCommand {
    pub actor: Actor,
    pub details: ListingDetails,
}

/// Handler for a business adding itself to the directory.
///
/// New listings wait for admin approval. The address is geocoded when
/// present; a geocoding failure only leaves the coordinates empty.
pub struct CreateListingHandler {
    listings: Arc<dyn DirectoryRepository>,
    geocoder: Arc<dyn Geocoder>,
}

impl CreateListingHandler {
    pub fn new(listings: Arc<dyn DirectoryRepository>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { listings, geocoder }
    }

    pub async fn handle(&self, cmd: CreateListingCommand) -> Result<DirectoryListing, DomainError> {
        if !(cmd.actor.is_business() || cmd.actor.is_admin()) {
            return Err(DomainError::forbidden(
                "Only business accounts can create directory listings",
            ));
        }
        let mut listing = DirectoryListing::create(cmd.actor.user_id, cmd.details)?;

        if let Some(address) = listing.details.address.clone() {
            match self.geocoder.geocode(&address).await {
                Ok(hit) => listing.set_coordinates(hit.latitude, hit.longitude),
                Err(e) => tracing::warn!(
                    listing_id = %listing.id,
                    error = %e,
                    "Listing geocoding failed; saving without coordinates"
                ),
            }
        }

        self.listings.save(&listing).await?;
        Ok(listing)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListListingsQuery {
    pub viewer: Option<Actor>,
    pub category: Option<ListingCategory>,
    /// Admins only; everyone else sees approved, active listings.
    pub status: Option<ListingStatus>,
}

pub struct ListListingsHandler {
    listings: Arc<dyn DirectoryRepository>,
}

impl ListListingsHandler {
    pub fn new(listings: Arc<dyn DirectoryRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, query: ListListingsQuery) -> Result<Vec<DirectoryListing>, DomainError> {
        let is_admin = query.viewer.as_ref().is_some_and(Actor::is_admin);
        let filter = if is_admin {
            ListingFilter {
                category: query.category,
                status: query.status,
                active_only: false,
            }
        } else {
            ListingFilter::public(query.category)
        };
        self.listings.list(&filter).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingDecision {
    Approve,
    Reject { reason: Option<String> },
}

#[derive(Debug, Clone)]
pub struct ReviewListingCommand {
    pub actor: Actor,
    pub listing_id: ListingId,
    pub decision: ListingDecision,
}

/// Admin approval or rejection of a pending listing.
pub struct ReviewListingHandler {
    listings: Arc<dyn DirectoryRepository>,
    audit: Arc<dyn AuditLog>,
}

impl ReviewListingHandler {
    pub fn new(listings: Arc<dyn DirectoryRepository>, audit: Arc<dyn AuditLog>) -> Self {
        Self { listings, audit }
    }

    pub async fn handle(&self, cmd: ReviewListingCommand) -> Result<DirectoryListing, DomainError> {
        cmd.actor.ensure_admin()?;
        let mut listing = load_listing(self.listings.as_ref(), &cmd.listing_id).await?;

        let action = match cmd.decision {
            ListingDecision::Approve => {
                listing.approve()?;
                AuditAction::ListingApproved
            }
            ListingDecision::Reject { reason } => {
                listing.reject(reason)?;
                AuditAction::ListingRejected
            }
        };
        self.listings.update(&listing).await?;

        record_audit(
            self.audit.as_ref(),
            AuditEntry::record(
                cmd.actor.user_id,
                action,
                "directory_listing",
                listing.id,
                json!({
                    "business_name": listing.details.business_name,
                    "reason": listing.rejection_reason,
                }),
            ),
        )
        .await;
        Ok(listing)
    }
}

#[derive(Debug, Clone)]
pub struct DeactivateListingCommand {
    pub actor: Actor,
    pub listing_id: ListingId,
}

/// Owner or admin hides a listing from the directory.
pub struct DeactivateListingHandler {
    listings: Arc<dyn DirectoryRepository>,
}

impl DeactivateListingHandler {
    pub fn new(listings: Arc<dyn DirectoryRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, cmd: DeactivateListingCommand) -> Result<DirectoryListing, DomainError> {
        let mut listing = load_listing(self.listings.as_ref(), &cmd.listing_id).await?;
        cmd.actor
            .ensure_can_act_for(&listing.owner_id, "directory_listing")?;
        listing.deactivate();
        self.listings.update(&listing).await?;
        Ok(listing)
    }
}
