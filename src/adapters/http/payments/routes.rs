//! Axum router configuration for payment endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    handle_stripe_webhook, list_payment_methods, refund_payment, update_subscription,
};
use crate::adapters::http::state::AppState;

/// Create the payments router, mounted at `/api/payments`.
///
/// # Routes
/// - `GET /methods` - The caller's saved cards
/// - `POST /:id/refund` - Full or partial refund (organizer or admin)
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/methods", get(list_payment_methods))
        .route("/:id/refund", post(refund_payment))
}

/// Create the subscriptions router, mounted at `/api/subscriptions`.
pub fn subscription_routes() -> Router<AppState> {
    Router::new().route("/", post(update_subscription))
}

/// Create the webhook router, mounted at `/api/webhooks`.
///
/// Webhooks carry no user credentials; they are verified via signature.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}
