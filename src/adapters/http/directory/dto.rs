//! Request DTOs for directory endpoints.

use serde::Deserialize;

use crate::domain::directory::{ListingCategory, ListingStatus};

/// Query string for `GET /api/directory`.
///
/// `status` is honoured for admins only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListListingsParams {
    pub category: Option<ListingCategory>,
    pub status: Option<ListingStatus>,
}
