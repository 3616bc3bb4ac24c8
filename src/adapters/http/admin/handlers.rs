//! HTTP handlers for admin endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::events::AnalyticsParams;
use crate::adapters::http::middleware::RequireAdmin;
use crate::adapters::http::state::AppState;
use crate::application::handlers::accounts::{
    AccountDecision, DeactivateAccountCommand, DeactivateAccountHandler,
    ListPendingAccountsHandler, ReviewAccountCommand, ReviewAccountHandler,
};
use crate::application::handlers::admin::{BackfillCoordinatesHandler, ListAuditLogHandler};
use crate::application::handlers::analytics::{GetEventAnalyticsHandler, GetEventAnalyticsQuery};
use crate::application::handlers::directory::{
    ListListingsHandler, ListListingsQuery, ListingDecision, ReviewListingCommand,
    ReviewListingHandler,
};
use crate::application::handlers::events::{
    CompleteEventCommand, CompleteEventHandler, EventDecision, ListEventsHandler, ListEventsQuery,
    ReviewEventCommand, ReviewEventHandler,
};
use crate::application::handlers::support::{UpdateTicketStatusCommand, UpdateTicketStatusHandler};
use crate::application::Actor;
use crate::domain::directory::ListingStatus;
use crate::domain::event::EventStatus;
use crate::domain::foundation::{EventId, ListingId, UserId};

use super::dto::{AuditLogParams, RejectEventRequest, RejectListingRequest, UpdateTicketRequest};

// ════════════════════════════════════════════════════════════════════════════════
// Event approval
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/events/pending
pub async fn list_pending_events(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let handler = ListEventsHandler::new(state.events.clone());
    let events = handler
        .handle(ListEventsQuery {
            viewer: Some(actor),
            status: Some(EventStatus::PendingApproval),
            ..Default::default()
        })
        .await?;
    Ok(Json(events))
}

async fn review_event(
    state: AppState,
    actor: Actor,
    id: &str,
    decision: EventDecision,
) -> Result<impl IntoResponse, ApiError> {
    let event_id: EventId = parse_id("event_id", id)?;
    let handler = ReviewEventHandler::new(
        state.events.clone(),
        state.profiles.clone(),
        state.email_queue.clone(),
        state.audit.clone(),
    );
    let event = handler
        .handle(ReviewEventCommand {
            actor,
            event_id,
            decision,
        })
        .await?;
    Ok(Json(event))
}

/// POST /api/admin/events/:id/approve
pub async fn approve_event(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    review_event(state, actor, &id, EventDecision::Approve).await
}

/// POST /api/admin/events/:id/reject
pub async fn reject_event(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
    Json(req): Json<RejectEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    review_event(state, actor, &id, EventDecision::Reject { reason: req.reason }).await
}

/// POST /api/admin/events/:id/complete
pub async fn complete_event(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id: EventId = parse_id("event_id", &id)?;
    let handler = CompleteEventHandler::new(state.events.clone(), state.audit.clone());
    let event = handler
        .handle(CompleteEventCommand { actor, event_id })
        .await?;
    Ok(Json(event))
}

// ════════════════════════════════════════════════════════════════════════════════
// Account approval
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/accounts/pending
pub async fn list_pending_accounts(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let handler = ListPendingAccountsHandler::new(state.profiles.clone());
    Ok(Json(handler.handle(&actor).await?))
}

async fn review_account(
    state: AppState,
    actor: Actor,
    id: &str,
    decision: AccountDecision,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id("user_id", id)?;
    let handler = ReviewAccountHandler::new(
        state.profiles.clone(),
        state.email_queue.clone(),
        state.audit.clone(),
    );
    let profile = handler
        .handle(ReviewAccountCommand {
            actor,
            user_id,
            decision,
        })
        .await?;
    Ok(Json(profile))
}

/// POST /api/admin/accounts/:id/approve
pub async fn approve_account(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    review_account(state, actor, &id, AccountDecision::Approve).await
}

/// POST /api/admin/accounts/:id/reject
pub async fn reject_account(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    review_account(state, actor, &id, AccountDecision::Reject).await
}

/// POST /api/admin/accounts/:id/deactivate
pub async fn deactivate_account(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id("user_id", &id)?;
    let handler = DeactivateAccountHandler::new(state.profiles.clone(), state.audit.clone());
    let profile = handler
        .handle(DeactivateAccountCommand { actor, user_id })
        .await?;
    Ok(Json(profile))
}

// ════════════════════════════════════════════════════════════════════════════════
// Directory moderation
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/listings/pending
pub async fn list_pending_listings(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let handler = ListListingsHandler::new(state.directory.clone());
    let listings = handler
        .handle(ListListingsQuery {
            viewer: Some(actor),
            category: None,
            status: Some(ListingStatus::Pending),
        })
        .await?;
    Ok(Json(listings))
}

async fn review_listing(
    state: AppState,
    actor: Actor,
    id: &str,
    decision: ListingDecision,
) -> Result<impl IntoResponse, ApiError> {
    let listing_id: ListingId = parse_id("listing_id", id)?;
    let handler = ReviewListingHandler::new(state.directory.clone(), state.audit.clone());
    let listing = handler
        .handle(ReviewListingCommand {
            actor,
            listing_id,
            decision,
        })
        .await?;
    Ok(Json(listing))
}

/// POST /api/admin/listings/:id/approve
pub async fn approve_listing(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    review_listing(state, actor, &id, ListingDecision::Approve).await
}

/// POST /api/admin/listings/:id/reject
pub async fn reject_listing(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
    Json(req): Json<RejectListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    review_listing(state, actor, &id, ListingDecision::Reject { reason: req.reason }).await
}

// ════════════════════════════════════════════════════════════════════════════════
// Support, audit and reporting
// ════════════════════════════════════════════════════════════════════════════════

/// PATCH /api/admin/support/tickets/:id
pub async fn update_ticket_status(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
    Json(req): Json<UpdateTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket_id = parse_id("ticket_id", &id)?;
    let handler = UpdateTicketStatusHandler::new(state.tickets.clone(), state.audit.clone());
    let ticket = handler
        .handle(UpdateTicketStatusCommand {
            actor,
            ticket_id,
            status: req.status,
        })
        .await?;
    Ok(Json(ticket))
}

/// GET /api/admin/audit-log?limit=
pub async fn list_audit_log(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Query(params): Query<AuditLogParams>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = ListAuditLogHandler::new(state.audit.clone());
    Ok(Json(handler.handle(&actor, params.limit).await?))
}

/// POST /api/admin/geocode/backfill
///
/// Retries geocoding for events and listings saved without coordinates.
pub async fn backfill_coordinates(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let handler = BackfillCoordinatesHandler::new(
        state.events.clone(),
        state.directory.clone(),
        state.geocoder.clone(),
    );
    Ok(Json(handler.handle(&actor).await?))
}

/// GET /api/admin/analytics
///
/// Figures across every event.
pub async fn platform_analytics(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Query(params): Query<AnalyticsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.into_query(None)?;
    let handler = GetEventAnalyticsHandler::new(state.events.clone(), state.analytics.clone());
    let report = handler
        .handle(GetEventAnalyticsQuery { actor, query })
        .await?;
    Ok(Json(report))
}
