//! HTTP handlers for event endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{OptionalAuth, RequireActor, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::analytics::{GetEventAnalyticsHandler, GetEventAnalyticsQuery};
use crate::application::handlers::events::{
    CancelEventCommand, CancelEventHandler, CreateEventCommand, CreateEventHandler,
    GetEventHandler, GetEventQuery, ListEventsHandler, ListEventsQuery, SubmitEventCommand,
    SubmitEventHandler, UpdateEventCommand, UpdateEventHandler,
};
use crate::application::handlers::registrations::{
    RegisterCompetitorCommand, RegisterCompetitorHandler,
};
use crate::application::handlers::scoring::{
    CreateScoringSessionCommand, CreateScoringSessionHandler, GetResultsHandler, GetResultsQuery,
    ListScoringSessionsHandler,
};
use crate::domain::event::EventDetails;
use crate::domain::foundation::EventId;
use crate::domain::registration::CompetitorEntry;

use super::dto::{
    AnalyticsParams, CreateEventResponse, CreateScoringSessionRequest, ListEventsParams,
    ResultsParams,
};

fn event_id(raw: &str) -> Result<EventId, ApiError> {
    parse_id("event_id", raw)
}

// ════════════════════════════════════════════════════════════════════════════════
// Events
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(params): Query<ListEventsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = state.optional_actor(user.as_ref()).await?;
    let handler = ListEventsHandler::new(state.events.clone());
    let events = handler
        .handle(ListEventsQuery {
            viewer,
            status: params.status,
            event_type: params.event_type,
            upcoming_only: params.upcoming,
            mine: params.mine,
            limit: params.limit,
        })
        .await?;
    Ok(Json(events))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Json(details): Json<EventDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = CreateEventHandler::new(state.events.clone(), state.geocoder.clone());
    let result = handler.handle(CreateEventCommand { actor, details }).await?;
    Ok((StatusCode::CREATED, Json(CreateEventResponse::from(result))))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = event_id(&id)?;
    let viewer = state.optional_actor(user.as_ref()).await?;
    let handler = GetEventHandler::new(state.events.clone());
    let event = handler.handle(GetEventQuery { viewer, event_id }).await?;
    Ok(Json(event))
}

/// PUT /api/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Json(details): Json<EventDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = event_id(&id)?;
    let handler = UpdateEventHandler::new(state.events.clone(), state.geocoder.clone());
    let event = handler
        .handle(UpdateEventCommand {
            actor,
            event_id,
            details,
        })
        .await?;
    Ok(Json(event))
}

/// POST /api/events/:id/submit
pub async fn submit_event(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = event_id(&id)?;
    let handler = SubmitEventHandler::new(state.events.clone());
    let event = handler.handle(SubmitEventCommand { actor, event_id }).await?;
    Ok(Json(event))
}

/// POST /api/events/:id/cancel
pub async fn cancel_event(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = event_id(&id)?;
    let handler = CancelEventHandler::new(state.events.clone(), state.audit.clone());
    let event = handler.handle(CancelEventCommand { actor, event_id }).await?;
    Ok(Json(event))
}

// ════════════════════════════════════════════════════════════════════════════════
// Event-scoped resources
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/events/:id/registrations
///
/// Any signed-in user may register; a profile is not required.
pub async fn register_competitor(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(entry): Json<CompetitorEntry>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = event_id(&id)?;
    let handler = RegisterCompetitorHandler::new(
        state.events.clone(),
        state.registrations.clone(),
        state.email_queue.clone(),
    );
    let registration = handler
        .handle(RegisterCompetitorCommand {
            user_id: user.id,
            event_id,
            entry,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// GET /api/events/:id/scoring-sessions
pub async fn list_scoring_sessions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = event_id(&id)?;
    let handler = ListScoringSessionsHandler::new(state.scoring.clone());
    Ok(Json(handler.handle(event_id).await?))
}

/// POST /api/events/:id/scoring-sessions
pub async fn create_scoring_session(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Json(req): Json<CreateScoringSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = event_id(&id)?;
    let handler = CreateScoringSessionHandler::new(state.events.clone(), state.scoring.clone());
    let session = handler
        .handle(CreateScoringSessionCommand {
            actor,
            event_id,
            category: req.category,
            criteria: req.criteria,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/events/:id/results?category=
pub async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ResultsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = event_id(&id)?;
    let handler = GetResultsHandler::new(state.scoring.clone());
    let results = handler
        .handle(GetResultsQuery {
            event_id,
            category: params.category,
        })
        .await?;
    Ok(Json(results))
}

/// GET /api/events/:id/analytics
pub async fn get_event_analytics(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Query(params): Query<AnalyticsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.into_query(Some(event_id(&id)?))?;
    let handler = GetEventAnalyticsHandler::new(state.events.clone(), state.analytics.clone());
    let report = handler
        .handle(GetEventAnalyticsQuery { actor, query })
        .await?;
    Ok(Json(report))
}
