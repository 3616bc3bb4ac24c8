//! Top-level router assembly and background jobs.

use std::time::Duration;

use axum::http::HeaderValue;
use axum::middleware::from_fn_with_state;
use axum::Router;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::accounts::{auth_routes, profile_routes};
use super::admin::admin_routes;
use super::directory::directory_routes;
use super::email::email_routes;
use super::events::event_routes;
use super::health::health_routes;
use super::middleware::{auth_middleware, inactivity_middleware};
use super::organizations::{organization_routes, team_routes};
use super::payments::{payment_routes, subscription_routes, webhook_routes};
use super::registrations::registration_routes;
use super::scoring::scoring_routes;
use super::state::AppState;
use super::support::support_routes;

/// Every `/api` route.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/profiles", profile_routes())
        .nest("/events", event_routes())
        .nest("/registrations", registration_routes())
        .nest("/scoring-sessions", scoring_routes())
        .nest("/payments", payment_routes())
        .nest("/subscriptions", subscription_routes())
        .nest("/webhooks", webhook_routes())
        .nest("/email", email_routes())
        .nest("/organizations", organization_routes())
        .nest("/teams", team_routes())
        .nest("/directory", directory_routes())
        .nest("/support", support_routes())
        .nest("/admin", admin_routes())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Builds the application router.
///
/// Bearer tokens are validated before the inactivity check, so idle
/// tracking only ever sees authenticated sessions.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.cors_origins);
    let timeout = state.settings.request_timeout;

    Router::new()
        .merge(health_routes())
        .nest("/api", api_routes())
        .layer(from_fn_with_state(
            state.sessions.clone(),
            inactivity_middleware,
        ))
        .layer(from_fn_with_state(
            state.session_validator.clone(),
            auth_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Drains the email queue on a fixed interval.
pub fn spawn_email_poller(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let handler = state.process_email_queue_handler();
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match handler.handle().await {
                Ok(result) if result.claimed > 0 => {
                    tracing::info!(
                        claimed = result.claimed,
                        sent = result.sent,
                        retrying = result.retrying,
                        failed = result.failed,
                        "Processed email queue"
                    );
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Email queue run failed"),
            }
        }
    })
}
