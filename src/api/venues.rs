//! Venue API endpoints.

use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use super::{success, ApiResult, AppJson, AppPath, DeletedPayload};
use crate::errors::AppError;
use crate::models::{
    partition_shows, Area, CreateVenueRequest, SearchRequest, SearchResults, UpdateVenueRequest,
    Venue, VenueDetail, VenueSummary,
};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AreasPayload {
    pub areas: Vec<Area>,
}

#[derive(Debug, Serialize)]
pub struct VenuePayload<T: Serialize> {
    pub venue: T,
}

/// GET /venues - Venues grouped by city and state.
pub async fn list_venues(State(state): State<AppState>) -> ApiResult<AreasPayload> {
    let areas = state.repo.venue_areas(Utc::now()).await?;
    success(AreasPayload { areas })
}

/// POST /venues/search - Venues whose name contains the search term.
pub async fn search_venues(
    State(state): State<AppState>,
    AppJson(request): AppJson<SearchRequest>,
) -> ApiResult<SearchResults<VenueSummary>> {
    let term = request.search_term.unwrap_or_default();
    let hits = state.repo.search_venues(&term, Utc::now()).await?;
    success(hits.into())
}

/// GET /venues/{id} - A venue with its past and upcoming shows.
pub async fn get_venue(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<VenuePayload<VenueDetail>> {
    let venue = state
        .repo
        .get_venue(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", id)))?;

    let shows = state.repo.shows_for_venue(id).await?;
    let (past_shows, upcoming_shows) = partition_shows(shows, Utc::now());

    success(VenuePayload {
        venue: VenueDetail {
            venue,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        },
    })
}

/// POST /venues - Create a new venue.
pub async fn create_venue(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateVenueRequest>,
) -> ApiResult<VenuePayload<Venue>> {
    for (field, value) in [
        ("name", &request.name),
        ("city", &request.city),
        ("state", &request.state),
        ("address", &request.address),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("Venue {} is required", field)));
        }
    }

    let venue = state.repo.create_venue(&request).await?;
    tracing::info!("Venue {} was successfully listed", venue.name);

    success(VenuePayload { venue })
}

/// PATCH /venues/{id} - Edit a venue.
pub async fn update_venue(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateVenueRequest>,
) -> ApiResult<VenuePayload<Venue>> {
    if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("Venue name cannot be blank".to_string()));
    }

    let venue = state.repo.update_venue(id, request).await?;
    tracing::info!("Venue {} was successfully updated", id);

    success(VenuePayload { venue })
}

/// DELETE /venues/{id} - Delete a venue and its shows.
pub async fn delete_venue(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<DeletedPayload> {
    state.repo.delete_venue(id).await?;
    tracing::info!("Deleted venue {}", id);

    success(DeletedPayload { deleted: id })
}
