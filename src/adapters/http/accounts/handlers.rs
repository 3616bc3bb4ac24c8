//! HTTP handlers for account endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Extension;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{RequireAuth, SessionKey};
use crate::adapters::http::state::AppState;
use crate::application::handlers::accounts::{
    CreateProfileCommand, CreateProfileHandler, GetProfileHandler, SignInCommand, SignInHandler,
    UpdateProfileHandler,
};
use crate::domain::account::SignInDecision;

use super::dto::{CreateProfileRequest, SessionResponse, UpdateProfileRequest};

/// POST /api/auth/session
///
/// Runs the sign-in gate after the identity provider has authenticated the
/// caller. A refusal also drops the session from the inactivity tracker.
pub async fn sign_in(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Option<Extension<SessionKey>>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = SignInHandler::new(state.profiles.clone());
    let decision = handler.handle(SignInCommand { user }).await?;

    if let (SignInDecision::SignOut { reason, .. }, Some(Extension(key))) = (&decision, session) {
        tracing::info!(reason = %reason, "Sign-in refused");
        state.sessions.forget(&key).await;
    }
    Ok(Json(SessionResponse::from(decision)))
}

/// DELETE /api/auth/session
pub async fn sign_out(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    session: Option<Extension<SessionKey>>,
) -> impl IntoResponse {
    if let Some(Extension(key)) = session {
        state.sessions.forget(&key).await;
    }
    StatusCode::NO_CONTENT
}

/// POST /api/profiles
pub async fn create_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = CreateProfileHandler::new(state.profiles.clone());
    let profile = handler
        .handle(CreateProfileCommand {
            user,
            account_type: req.account_type,
            display_name: req.display_name,
            company_name: req.company_name,
            phone: req.phone,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/profiles/me
pub async fn get_my_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let handler = GetProfileHandler::new(state.profiles.clone());
    Ok(Json(handler.handle(user.id).await?))
}

/// PATCH /api/profiles/me
pub async fn update_my_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = UpdateProfileHandler::new(state.profiles.clone());
    Ok(Json(handler.handle(user.id, req.into()).await?))
}
