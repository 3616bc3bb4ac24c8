//! HTTP handlers for registration endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::RequireActor;
use crate::adapters::http::state::AppState;
use crate::application::handlers::payments::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, ListPaymentsHandler,
    ListPaymentsQuery,
};
use crate::application::handlers::registrations::{
    ApproveRegistrationCommand, ApproveRegistrationHandler, CancelRegistrationCommand,
    CancelRegistrationHandler, CheckInCommand, CheckInHandler, GetRegistrationHandler,
    GetRegistrationQuery, ListRegistrationsHandler, ListRegistrationsQuery,
};
use crate::domain::foundation::RegistrationId;

use super::dto::{ListRegistrationsParams, PaymentIntentResponse};

fn registration_id(raw: &str) -> Result<RegistrationId, ApiError> {
    parse_id("registration_id", raw)
}

/// GET /api/registrations
///
/// Competitors see their own; organizers filter by their event.
pub async fn list_registrations(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Query(params): Query<ListRegistrationsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = params.event_id()?;
    let user_id = params.user_id()?;
    let handler =
        ListRegistrationsHandler::new(state.events.clone(), state.registrations.clone());
    let registrations = handler
        .handle(ListRegistrationsQuery {
            actor,
            event_id,
            user_id,
            status: params.status,
        })
        .await?;
    Ok(Json(registrations))
}

/// GET /api/registrations/:id
pub async fn get_registration(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let registration_id = registration_id(&id)?;
    let handler = GetRegistrationHandler::new(state.events.clone(), state.registrations.clone());
    let registration = handler
        .handle(GetRegistrationQuery {
            actor,
            registration_id,
        })
        .await?;
    Ok(Json(registration))
}

/// POST /api/registrations/:id/approve
pub async fn approve_registration(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let registration_id = registration_id(&id)?;
    let handler =
        ApproveRegistrationHandler::new(state.events.clone(), state.registrations.clone());
    let registration = handler
        .handle(ApproveRegistrationCommand {
            actor,
            registration_id,
        })
        .await?;
    Ok(Json(registration))
}

/// POST /api/registrations/:id/cancel
pub async fn cancel_registration(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let registration_id = registration_id(&id)?;
    let handler =
        CancelRegistrationHandler::new(state.events.clone(), state.registrations.clone());
    let registration = handler
        .handle(CancelRegistrationCommand {
            actor,
            registration_id,
        })
        .await?;
    Ok(Json(registration))
}

/// POST /api/registrations/:id/check-in
pub async fn check_in(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let registration_id = registration_id(&id)?;
    let handler = CheckInHandler::new(state.events.clone(), state.registrations.clone());
    let check_in = handler
        .handle(CheckInCommand {
            actor,
            registration_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(check_in)))
}

/// POST /api/registrations/:id/payment-intent
pub async fn create_payment_intent(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let registration_id = registration_id(&id)?;
    let handler = CreatePaymentIntentHandler::new(
        state.events.clone(),
        state.registrations.clone(),
        state.payments.clone(),
        state.profiles.clone(),
        state.payment_provider.clone(),
        state.settings.currency.clone(),
    );
    let result = handler
        .handle(CreatePaymentIntentCommand {
            actor,
            registration_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(PaymentIntentResponse::from(result))))
}

/// GET /api/registrations/:id/payments
pub async fn list_payments(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let registration_id = registration_id(&id)?;
    let handler = ListPaymentsHandler::new(
        state.events.clone(),
        state.registrations.clone(),
        state.payments.clone(),
    );
    let payments = handler
        .handle(ListPaymentsQuery {
            actor,
            registration_id,
        })
        .await?;
    Ok(Json(payments))
}
