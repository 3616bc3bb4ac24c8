//! Axum router configuration for organization endpoints.

use axum::routing::{delete, get, post};
use axum::Router;

use super::handlers::{
    add_team_member, create_organization, create_team, get_organization, list_my_organizations,
    list_team_members, list_teams, remove_team_member,
};
use crate::adapters::http::state::AppState;

/// Create the organizations router, mounted at `/api/organizations`.
pub fn organization_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_organization))
        .route("/mine", get(list_my_organizations))
        .route("/:id", get(get_organization))
        .route("/:id/teams", get(list_teams).post(create_team))
}

/// Create the teams router, mounted at `/api/teams`.
pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/members", get(list_team_members).post(add_team_member))
        .route("/:id/members/:user_id", delete(remove_team_member))
}
