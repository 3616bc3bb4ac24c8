//! HTTP handlers for judging endpoints.
//!
//! Judges act under their own identity; assignment is checked by the
//! application layer, so a profile is not required to score.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{RequireActor, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::scoring::{
    AssignJudgeCommand, AssignJudgeHandler, CloseScoringSessionCommand,
    CloseScoringSessionHandler, ComputeResultsCommand, ComputeResultsHandler,
    FinalizeScoreCommand, FinalizeScoreHandler, SubmitScoreCommand, SubmitScoreHandler,
};
use crate::domain::foundation::{RegistrationId, ScoringSessionId};

use super::dto::{AssignJudgeRequest, CloseSessionResponse, SubmitScoreRequest};

fn session_id(raw: &str) -> Result<ScoringSessionId, ApiError> {
    parse_id("session_id", raw)
}

/// POST /api/scoring-sessions/:id/judges
pub async fn assign_judge(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Json(req): Json<AssignJudgeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = session_id(&id)?;
    let judge_id = parse_id("judge_id", &req.judge_id)?;
    let handler = AssignJudgeHandler::new(state.events.clone(), state.scoring.clone());
    let assignment = handler
        .handle(AssignJudgeCommand {
            actor,
            session_id,
            judge_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// PUT /api/scoring-sessions/:id/scores/:registration_id
pub async fn submit_score(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, registration)): Path<(String, String)>,
    Json(req): Json<SubmitScoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = session_id(&id)?;
    let registration_id: RegistrationId = parse_id("registration_id", &registration)?;
    let handler = SubmitScoreHandler::new(state.scoring.clone(), state.registrations.clone());
    let score = handler
        .handle(SubmitScoreCommand {
            judge_id: user.id,
            session_id,
            registration_id,
            points: req.points,
        })
        .await?;
    Ok(Json(score))
}

/// POST /api/scoring-sessions/:id/scores/:registration_id/finalize
pub async fn finalize_score(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, registration)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = session_id(&id)?;
    let registration_id: RegistrationId = parse_id("registration_id", &registration)?;
    let handler = FinalizeScoreHandler::new(state.scoring.clone());
    let score = handler
        .handle(FinalizeScoreCommand {
            judge_id: user.id,
            session_id,
            registration_id,
        })
        .await?;
    Ok(Json(score))
}

/// POST /api/scoring-sessions/:id/compute
///
/// Preview standings without closing the session.
pub async fn compute_results(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = session_id(&id)?;
    let handler = ComputeResultsHandler::new(
        state.events.clone(),
        state.registrations.clone(),
        state.scoring.clone(),
    );
    let results = handler
        .handle(ComputeResultsCommand { actor, session_id })
        .await?;
    Ok(Json(results))
}

/// POST /api/scoring-sessions/:id/close
pub async fn close_session(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = session_id(&id)?;
    let handler = CloseScoringSessionHandler::new(
        state.events.clone(),
        state.registrations.clone(),
        state.scoring.clone(),
        state.audit.clone(),
    );
    let result = handler
        .handle(CloseScoringSessionCommand { actor, session_id })
        .await?;
    Ok(Json(CloseSessionResponse::from(result)))
}
