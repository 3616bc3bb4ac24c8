//! Axum router configuration for directory endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{create_listing, deactivate_listing, list_listings};
use crate::adapters::http::state::AppState;

/// Create the directory router, mounted at `/api/directory`.
///
/// Listing review lives under `/api/admin/listings`.
pub fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_listings).post(create_listing))
        .route("/:id/deactivate", post(deactivate_listing))
}
