//! Axum router configuration for judging endpoints.

use axum::routing::{post, put};
use axum::Router;

use super::handlers::{assign_judge, close_session, compute_results, finalize_score, submit_score};
use crate::adapters::http::state::AppState;

/// Create the judging router, mounted at `/api/scoring-sessions`.
///
/// Sessions are opened under `/api/events/:id/scoring-sessions`.
pub fn scoring_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/judges", post(assign_judge))
        .route("/:id/scores/:registration_id", put(submit_score))
        .route(
            "/:id/scores/:registration_id/finalize",
            post(finalize_score),
        )
        .route("/:id/compute", post(compute_results))
        .route("/:id/close", post(close_session))
}
