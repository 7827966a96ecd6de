//! Show API endpoints.

use axum::extract::State;
use serde::Serialize;

use super::{success, ApiResult, AppJson};
use crate::errors::AppError;
use crate::models::{is_storable_start_time, CreateShowRequest, ShowListing};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ShowsPayload {
    pub shows: Vec<ShowListing>,
}

#[derive(Debug, Serialize)]
pub struct ShowPayload {
    pub show: ShowListing,
}

/// GET /shows - All shows by start time.
pub async fn list_shows(State(state): State<AppState>) -> ApiResult<ShowsPayload> {
    let shows = state.repo.list_shows().await?;
    success(ShowsPayload { shows })
}

/// POST /shows - List a new show.
pub async fn create_show(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateShowRequest>,
) -> ApiResult<ShowPayload> {
    let (Some(artist_id), Some(venue_id), Some(start_time)) =
        (request.artist_id, request.venue_id, request.start_time)
    else {
        return Err(AppError::BadRequest(
            "artist_id, venue_id and start_time are required".to_string(),
        ));
    };
    if !is_storable_start_time(&start_time) {
        return Err(AppError::BadRequest(format!(
            "start_time {} is outside years 0000 to 9999",
            start_time
        )));
    }

    let show = state
        .repo
        .create_show(artist_id, venue_id, start_time)
        .await?;
    tracing::info!(
        "Show {} was successfully listed ({} at {})",
        show.id,
        show.artist_name,
        show.venue_name
    );

    success(ShowPayload { show })
}
