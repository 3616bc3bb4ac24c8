//! HTTP handlers for payment endpoints.

use axum::body::Bytes;
use axum::extract::{Json, Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::RequireActor;
use crate::adapters::http::state::AppState;
use crate::application::handlers::payments::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, ListPaymentMethodsHandler,
    RefundPaymentCommand, RefundPaymentHandler, UpdateSubscriptionCommand,
    UpdateSubscriptionHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, PaymentId};

use super::dto::{RefundRequest, RefundResponse, SubscriptionRequest, WebhookResponse};

/// POST /api/payments/:id/refund
pub async fn refund_payment(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Json(req): Json<RefundRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_id: PaymentId = parse_id("payment_id", &id)?;
    let handler = RefundPaymentHandler::new(
        state.events.clone(),
        state.registrations.clone(),
        state.payments.clone(),
        state.payment_provider.clone(),
        state.audit.clone(),
    );
    let result = handler
        .handle(RefundPaymentCommand {
            actor,
            payment_id,
            amount_cents: req.amount_cents,
            reason: req.reason,
        })
        .await?;
    Ok(Json(RefundResponse::from(result)))
}

/// GET /api/payments/methods
pub async fn list_payment_methods(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
) -> Result<impl IntoResponse, ApiError> {
    let handler =
        ListPaymentMethodsHandler::new(state.profiles.clone(), state.payment_provider.clone());
    Ok(Json(handler.handle(actor.user_id).await?))
}

/// POST /api/subscriptions
pub async fn update_subscription(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Json(req): Json<SubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler =
        UpdateSubscriptionHandler::new(state.profiles.clone(), state.payment_provider.clone());
    let subscription = handler
        .handle(UpdateSubscriptionCommand {
            actor,
            change: req.into(),
        })
        .await?;
    Ok(Json(subscription))
}

/// POST /api/webhooks/stripe
///
/// Unauthenticated; the signature over the raw body is the credential.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            DomainError::new(
                ErrorCode::InvalidWebhookSignature,
                "Missing Stripe-Signature header",
            )
        })?;

    let handler = HandlePaymentWebhookHandler::new(
        state.payments.clone(),
        state.registrations.clone(),
        state.payment_provider.clone(),
        state.email_queue.clone(),
    );
    let result = handler
        .handle(HandlePaymentWebhookCommand {
            payload: body.to_vec(),
            signature: signature.to_string(),
        })
        .await?;
    Ok(Json(WebhookResponse::from(result)))
}
