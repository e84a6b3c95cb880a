/// Playlist track positioning API routes
///
/// Only the owner may change a playlist's tracks.
use crate::{error::Result, extract::ApiJson, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cadence_core::types::{PlaylistEntry, PlaylistId, TrackId};
use cadence_core::CadenceError;
use cadence_storage::playlists;
use serde::Deserialize;

/// GET /api/playlists/:id/tracks - Entries by position
pub async fn list_tracks(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<PlaylistEntry>>> {
    let pool = app_state.store.pool();
    let playlist_id = PlaylistId::new(id);

    if playlists::get_by_id(pool, &playlist_id).await?.is_none() {
        return Err(CadenceError::PlaylistNotFound(playlist_id).into());
    }

    Ok(Json(playlists::get_entries(pool, &playlist_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct AddTrackRequest {
    pub track_id: TrackId,
}

/// POST /api/playlists/:id/tracks - Append a track
pub async fn add_track(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<AddTrackRequest>,
) -> Result<(StatusCode, Json<PlaylistEntry>)> {
    let entry = playlists::add_track(
        app_state.store.pool(),
        &PlaylistId::new(id),
        &request.track_id,
        auth.user_id(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/playlists/:id/tracks/:track_id
pub async fn remove_track(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path((id, track_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    playlists::remove_track(
        app_state.store.pool(),
        &PlaylistId::new(id),
        &TrackId::new(track_id),
        auth.user_id(),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub position: i64,
}

/// PUT /api/playlists/:id/tracks/:track_id/position - Move a track
pub async fn reorder_track(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path((id, track_id)): Path<(String, String)>,
    ApiJson(request): ApiJson<ReorderRequest>,
) -> Result<Json<Vec<PlaylistEntry>>> {
    let pool = app_state.store.pool();
    let playlist_id = PlaylistId::new(id);

    playlists::reorder_track(
        pool,
        &playlist_id,
        &TrackId::new(track_id),
        request.position,
        auth.user_id(),
    )
    .await?;

    Ok(Json(playlists::get_entries(pool, &playlist_id).await?))
}
