/// Play history API routes
use crate::{error::Result, extract::ApiJson, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use cadence_core::types::{PlayHistoryEntry, TrackId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RecordPlayRequest {
    pub track_id: TrackId,
    #[serde(default)]
    pub play_duration_seconds: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RecordPlayResponse {
    pub counted: bool,
}

/// POST /api/plays - Record a listen
pub async fn record_play(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(request): ApiJson<RecordPlayRequest>,
) -> Result<Json<RecordPlayResponse>> {
    let counted = app_state
        .playback
        .record_play(
            auth.user_id(),
            &request.track_id,
            request.play_duration_seconds,
        )
        .await?;
    Ok(Json(RecordPlayResponse { counted }))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// GET /api/plays/recent - Newest first
pub async fn recent_plays(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<PlayHistoryEntry>>> {
    let plays = app_state
        .playback
        .recent_plays(auth.user_id(), query.limit)
        .await?;
    Ok(Json(plays))
}

#[derive(Debug, Serialize)]
pub struct PlayCountResponse {
    pub track_id: TrackId,
    pub play_count: i64,
}

/// GET /api/tracks/:id/play-count
pub async fn play_count(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(track_id): Path<String>,
) -> Result<Json<PlayCountResponse>> {
    let track_id = TrackId::new(track_id);
    let play_count = app_state.playback.play_count(&track_id).await?;
    Ok(Json(PlayCountResponse {
        track_id,
        play_count,
    }))
}
