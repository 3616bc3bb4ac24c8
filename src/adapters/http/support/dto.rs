//! Request DTOs for support endpoints.

use serde::Deserialize;

use crate::domain::support::TicketPriority;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicketRequest {
    /// Required for anonymous reporters; defaults to the caller's email.
    pub user_email: Option<String>,
    pub subject: String,
    pub description: String,
    pub priority: Option<TicketPriority>,
    pub category: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}
