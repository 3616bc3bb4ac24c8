//! Axum router configuration for email endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{enqueue_email, process_queue, send_email};
use crate::adapters::http::state::AppState;

/// Create the email router, mounted at `/api/email`.
pub fn email_routes() -> Router<AppState> {
    Router::new()
        .route("/send", post(send_email))
        .route("/queue", post(enqueue_email))
        .route("/process-queue", post(process_queue))
}
