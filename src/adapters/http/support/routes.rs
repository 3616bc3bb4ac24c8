//! Axum router configuration for support endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{create_ticket, list_tickets};
use crate::adapters::http::state::AppState;

/// Create the support router, mounted at `/api/support`.
pub fn support_routes() -> Router<AppState> {
    Router::new().route("/tickets", post(create_ticket).get(list_tickets))
}
