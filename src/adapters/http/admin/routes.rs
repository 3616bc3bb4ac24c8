//! Axum router configuration for admin endpoints.

use axum::routing::{get, patch, post};
use axum::Router;

use super::handlers::{
    approve_account, approve_event, approve_listing, backfill_coordinates, complete_event,
    deactivate_account, list_audit_log, list_pending_accounts, list_pending_events,
    list_pending_listings, platform_analytics, reject_account, reject_event, reject_listing,
    update_ticket_status,
};
use crate::adapters::http::state::AppState;

/// Create the admin router, mounted at `/api/admin`.
///
/// # Routes
///
/// ## Approval queues
/// - `GET /events/pending`, `POST /events/:id/{approve,reject,complete}`
/// - `GET /accounts/pending`, `POST /accounts/:id/{approve,reject,deactivate}`
/// - `GET /listings/pending`, `POST /listings/:id/{approve,reject}`
///
/// ## Operations
/// - `PATCH /support/tickets/:id` - Move a ticket through its workflow
/// - `POST /geocode/backfill` - Geocode events and listings missing coordinates
/// - `GET /audit-log` - Most recent admin actions
/// - `GET /analytics` - Platform-wide figures
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/events/pending", get(list_pending_events))
        .route("/events/:id/approve", post(approve_event))
        .route("/events/:id/reject", post(reject_event))
        .route("/events/:id/complete", post(complete_event))
        .route("/accounts/pending", get(list_pending_accounts))
        .route("/accounts/:id/approve", post(approve_account))
        .route("/accounts/:id/reject", post(reject_account))
        .route("/accounts/:id/deactivate", post(deactivate_account))
        .route("/listings/pending", get(list_pending_listings))
        .route("/listings/:id/approve", post(approve_listing))
        .route("/listings/:id/reject", post(reject_listing))
        .route("/support/tickets/:id", patch(update_ticket_status))
        .route("/geocode/backfill", post(backfill_coordinates))
        .route("/audit-log", get(list_audit_log))
        .route("/analytics", get(platform_analytics))
}
