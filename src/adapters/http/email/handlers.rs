//! HTTP handlers for email endpoints. All require an admin.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAdmin;
use crate::adapters::http::state::AppState;
use crate::application::handlers::email::{
    EnqueueEmailCommand, EnqueueEmailHandler, SendEmailCommand, SendEmailHandler,
};
use crate::domain::email::EmailMessage;

use super::dto::{EnqueueEmailRequest, SentEmailResponse};

/// POST /api/email/send
pub async fn send_email(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Json(message): Json<EmailMessage>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = SendEmailHandler::new(state.email_sender.clone());
    let sent = handler.handle(SendEmailCommand { actor, message }).await?;
    Ok(Json(SentEmailResponse::from(sent)))
}

/// POST /api/email/queue
pub async fn enqueue_email(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Json(req): Json<EnqueueEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = EnqueueEmailHandler::new(state.email_queue.clone());
    let queued = handler
        .handle(EnqueueEmailCommand {
            actor,
            message: req.message,
            scheduled_at: req.scheduled_at,
        })
        .await?;
    Ok((StatusCode::ACCEPTED, Json(queued)))
}

/// POST /api/email/process-queue
///
/// Runs one batch immediately, in addition to the background poller.
pub async fn process_queue(
    State(state): State<AppState>,
    RequireAdmin(_actor): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.process_email_queue_handler().handle().await?;
    Ok(Json(result))
}
