//! HTTP handlers for organization and team endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{RequireActor, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::organizations::{
    AddTeamMemberCommand, AddTeamMemberHandler, CreateOrganizationCommand,
    CreateOrganizationHandler, CreateTeamCommand, CreateTeamHandler, GetOrganizationHandler,
    ListMyOrganizationsHandler, ListTeamMembersHandler, ListTeamsHandler,
    RemoveTeamMemberCommand, RemoveTeamMemberHandler,
};
use crate::domain::foundation::{OrganizationId, TeamId};

use super::dto::{AddTeamMemberRequest, CreateOrganizationRequest, CreateTeamRequest};

fn organization_id(raw: &str) -> Result<OrganizationId, ApiError> {
    parse_id("organization_id", raw)
}

fn team_id(raw: &str) -> Result<TeamId, ApiError> {
    parse_id("team_id", raw)
}

/// POST /api/organizations
pub async fn create_organization(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = CreateOrganizationHandler::new(state.organizations.clone());
    let organization = handler
        .handle(CreateOrganizationCommand {
            owner_id: user.id,
            name: req.name,
            slug: req.slug,
            description: req.description,
            website: req.website,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// GET /api/organizations/mine
pub async fn list_my_organizations(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let handler = ListMyOrganizationsHandler::new(state.organizations.clone());
    Ok(Json(handler.handle(user.id).await?))
}

/// GET /api/organizations/:id
pub async fn get_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = GetOrganizationHandler::new(state.organizations.clone());
    Ok(Json(handler.handle(organization_id(&id)?).await?))
}

/// GET /api/organizations/:id/teams
pub async fn list_teams(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = ListTeamsHandler::new(state.organizations.clone());
    Ok(Json(handler.handle(organization_id(&id)?).await?))
}

/// POST /api/organizations/:id/teams
pub async fn create_team(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let organization_id = organization_id(&id)?;
    let handler = CreateTeamHandler::new(state.organizations.clone());
    let team = handler
        .handle(CreateTeamCommand {
            actor,
            organization_id,
            name: req.name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// GET /api/teams/:id/members
pub async fn list_team_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = ListTeamMembersHandler::new(state.organizations.clone());
    Ok(Json(handler.handle(team_id(&id)?).await?))
}

/// POST /api/teams/:id/members
pub async fn add_team_member(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Json(req): Json<AddTeamMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let team_id = team_id(&id)?;
    let user_id = parse_id("user_id", &req.user_id)?;
    let handler = AddTeamMemberHandler::new(state.organizations.clone());
    let member = handler
        .handle(AddTeamMemberCommand {
            actor,
            team_id,
            user_id,
            role: req.role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /api/teams/:id/members/:user_id
pub async fn remove_team_member(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path((id, user)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let team_id = team_id(&id)?;
    let user_id = parse_id("user_id", &user)?;
    let handler = RemoveTeamMemberHandler::new(state.organizations.clone());
    handler
        .handle(RemoveTeamMemberCommand {
            actor,
            team_id,
            user_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
