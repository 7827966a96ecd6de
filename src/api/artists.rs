//! Artist API endpoints.

use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use super::{success, ApiResult, AppJson, AppPath};
use crate::errors::AppError;
use crate::models::{
    partition_shows, Artist, ArtistDetail, ArtistSearchHit, ArtistSummary, CreateArtistRequest,
    SearchRequest, SearchResults, UpdateArtistRequest,
};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ArtistsPayload {
    pub artists: Vec<ArtistSummary>,
}

#[derive(Debug, Serialize)]
pub struct ArtistPayload<T: Serialize> {
    pub artist: T,
}

/// GET /artists - Artists in name order.
pub async fn list_artists(State(state): State<AppState>) -> ApiResult<ArtistsPayload> {
    let artists = state.repo.list_artists().await?;
    success(ArtistsPayload { artists })
}

/// POST /artists/search - Artists whose name contains the search term.
pub async fn search_artists(
    State(state): State<AppState>,
    AppJson(request): AppJson<SearchRequest>,
) -> ApiResult<SearchResults<ArtistSearchHit>> {
    let term = request.search_term.unwrap_or_default();
    let hits = state.repo.search_artists(&term, Utc::now()).await?;
    success(hits.into())
}

/// GET /artists/{id} - An artist with past and upcoming shows.
pub async fn get_artist(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<ArtistPayload<ArtistDetail>> {
    let artist = state
        .repo
        .get_artist(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))?;

    let shows = state.repo.shows_for_artist(id).await?;
    let (past_shows, upcoming_shows) = partition_shows(shows, Utc::now());

    success(ArtistPayload {
        artist: ArtistDetail {
            artist,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        },
    })
}

/// POST /artists - Create a new artist.
pub async fn create_artist(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateArtistRequest>,
) -> ApiResult<ArtistPayload<Artist>> {
    for (field, value) in [
        ("name", &request.name),
        ("city", &request.city),
        ("state", &request.state),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("Artist {} is required", field)));
        }
    }

    let artist = state.repo.create_artist(&request).await?;
    tracing::info!("Artist {} was successfully listed", artist.name);

    success(ArtistPayload { artist })
}

/// PATCH /artists/{id} - Edit an artist.
pub async fn update_artist(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateArtistRequest>,
) -> ApiResult<ArtistPayload<Artist>> {
    if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("Artist name cannot be blank".to_string()));
    }

    let artist = state.repo.update_artist(id, request).await?;
    tracing::info!("Artist {} was successfully updated", id);

    success(ArtistPayload { artist })
}
