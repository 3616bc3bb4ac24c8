//! Axum router configuration for account endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{create_profile, get_my_profile, sign_in, sign_out, update_my_profile};
use crate::adapters::http::state::AppState;

/// Create the auth router, mounted at `/api/auth`.
///
/// # Routes
/// - `POST /session` - Evaluate the sign-in rules for the bearer
/// - `DELETE /session` - Sign out
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/session", post(sign_in).delete(sign_out))
}

/// Create the profile router, mounted at `/api/profiles`.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_profile))
        .route("/me", get(get_my_profile).patch(update_my_profile))
}
