//! Request DTOs for admin endpoints.

use serde::Deserialize;

use crate::domain::support::TicketStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct RejectEventRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectListingRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTicketRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogParams {
    pub limit: Option<u32>,
}
