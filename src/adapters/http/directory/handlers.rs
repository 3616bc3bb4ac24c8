//! HTTP handlers for directory endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{OptionalAuth, RequireActor};
use crate::adapters::http::state::AppState;
use crate::application::handlers::directory::{
    CreateListingCommand, CreateListingHandler, DeactivateListingCommand,
    DeactivateListingHandler, ListListingsHandler, ListListingsQuery,
};
use crate::domain::directory::ListingDetails;

use super::dto::ListListingsParams;

/// GET /api/directory
pub async fn list_listings(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(params): Query<ListListingsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = state.optional_actor(user.as_ref()).await?;
    let handler = ListListingsHandler::new(state.directory.clone());
    let listings = handler
        .handle(ListListingsQuery {
            viewer,
            category: params.category,
            status: params.status,
        })
        .await?;
    Ok(Json(listings))
}

/// POST /api/directory
pub async fn create_listing(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Json(details): Json<ListingDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = CreateListingHandler::new(state.directory.clone(), state.geocoder.clone());
    let listing = handler
        .handle(CreateListingCommand { actor, details })
        .await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// POST /api/directory/:id/deactivate
pub async fn deactivate_listing(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let listing_id = parse_id("listing_id", &id)?;
    let handler = DeactivateListingHandler::new(state.directory.clone());
    let listing = handler
        .handle(DeactivateListingCommand { actor, listing_id })
        .await?;
    Ok(Json(listing))
}
