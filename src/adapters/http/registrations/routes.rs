//! Axum router configuration for registration endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    approve_registration, cancel_registration, check_in, create_payment_intent,
    get_registration, list_payments, list_registrations,
};
use crate::adapters::http::state::AppState;

/// Create the registrations router, mounted at `/api/registrations`.
///
/// Registering for an event lives under `/api/events/:id/registrations`.
pub fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_registrations))
        .route("/:id", get(get_registration))
        .route("/:id/approve", post(approve_registration))
        .route("/:id/cancel", post(cancel_registration))
        .route("/:id/check-in", post(check_in))
        .route("/:id/payment-intent", post(create_payment_intent))
        .route("/:id/payments", get(list_payments))
}
