//! HTTP handlers for support endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{OptionalAuth, RequireActor};
use crate::adapters::http::state::AppState;
use crate::application::handlers::support::{
    CreateTicketCommand, CreateTicketHandler, ListTicketsHandler,
};

use super::dto::CreateTicketRequest;

/// POST /api/support/tickets
///
/// Open to anonymous visitors.
pub async fn create_ticket(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Json(req): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = state.optional_actor(user.as_ref()).await?;
    let user_email = req
        .user_email
        .or_else(|| user.map(|u| u.email))
        .unwrap_or_default();
    let handler = CreateTicketHandler::new(state.tickets.clone());
    let ticket = handler
        .handle(CreateTicketCommand {
            actor,
            user_email,
            subject: req.subject,
            description: req.description,
            priority: req.priority,
            category: req.category,
            attachments: req.attachments,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/support/tickets
///
/// The caller's own tickets; admins see all.
pub async fn list_tickets(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
) -> Result<impl IntoResponse, ApiError> {
    let handler = ListTicketsHandler::new(state.tickets.clone());
    Ok(Json(handler.handle(&actor).await?))
}
