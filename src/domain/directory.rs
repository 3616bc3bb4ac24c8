//! Business directory of retailers, manufacturers and installers.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    str_enum, DomainError, ListingId, StateMachine, Timestamp, UserId, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingCategory {
    Retailer,
    Manufacturer,
    Installer,
    Other,
}

str_enum!(ListingCategory {
    Retailer => "retailer",
    Manufacturer => "manufacturer",
    Installer => "installer",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
}

str_enum!(ListingStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

impl StateMachine for ListingStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ListingStatus::*;
        matches!((self, target), (Pending, Approved) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ListingStatus::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved | Rejected => vec![],
        }
    }
}

/// Fields supplied by the business when creating a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDetails {
    pub business_name: String,
    pub category: ListingCategory,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl ListingDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.business_name.trim().is_empty() {
            return Err(ValidationError::empty_field("business_name"));
        }
        if let Some(website) = &self.website {
            if !(website.starts_with("https://") || website.starts_with("http://")) {
                return Err(ValidationError::invalid_format(
                    "website",
                    "must be an http(s) URL",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryListing {
    pub id: ListingId,
    pub owner_id: UserId,
    #[serde(flatten)]
    pub details: ListingDetails,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: ListingStatus,
    pub rejection_reason: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DirectoryListing {
    pub fn create(owner_id: UserId, details: ListingDetails) -> Result<Self, ValidationError> {
        details.validate()?;
        let now = Timestamp::now();
        Ok(Self {
            id: ListingId::new(),
            owner_id,
            details,
            latitude: None,
            longitude: None,
            status: ListingStatus::Pending,
            rejection_reason: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Shown in the public directory.
    pub fn is_visible(&self) -> bool {
        self.status == ListingStatus::Approved && self.is_active
    }

    pub fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self.touch();
    }

    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(ListingStatus::Approved)?;
        self.touch();
        Ok(())
    }

    pub fn reject(&mut self, reason: Option<String>) -> Result<(), DomainError> {
        self.status = self.status.transition_to(ListingStatus::Rejected)?;
        self.rejection_reason = reason;
        self.touch();
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
