//! Axum router configuration for event endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    cancel_event, create_event, create_scoring_session, get_event, get_event_analytics,
    get_results, list_events, list_scoring_sessions, register_competitor, submit_event,
    update_event,
};
use crate::adapters::http::state::AppState;

/// Create the events router, mounted at `/api/events`.
///
/// # Routes
///
/// ## Public (optional authentication)
/// - `GET /` - Published events, or the caller's own with `mine=true`
/// - `GET /:id` - One event
/// - `GET /:id/results` - Final standings
/// - `GET /:id/scoring-sessions` - Judging sessions
///
/// ## Organizer
/// - `POST /` - Create a draft
/// - `PUT /:id` - Edit a draft
/// - `POST /:id/submit` - Submit for approval
/// - `POST /:id/cancel` - Cancel
/// - `POST /:id/scoring-sessions` - Open a judging session
/// - `GET /:id/analytics` - Registration, revenue and attendance figures
///
/// ## Competitor
/// - `POST /:id/registrations` - Register for the event
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/:id", get(get_event).put(update_event))
        .route("/:id/submit", post(submit_event))
        .route("/:id/cancel", post(cancel_event))
        .route("/:id/registrations", post(register_competitor))
        .route(
            "/:id/scoring-sessions",
            get(list_scoring_sessions).post(create_scoring_session),
        )
        .route("/:id/results", get(get_results))
        .route("/:id/analytics", get(get_event_analytics))
}
