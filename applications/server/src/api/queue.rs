/// Manual queue API routes
use crate::{error::Result, extract::ApiJson, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use cadence_core::types::{PlaybackContext, QueueEntry, QueueItem, QueueItemId, TrackId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// GET /api/queue - Queued tracks by position
pub async fn list_queue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<QueueEntry>>> {
    let entries = app_state
        .playback
        .list_queue(auth.user_id(), query.limit)
        .await?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct EnqueueRequest {
    pub track_id: TrackId,
    #[serde(default)]
    pub context: Option<PlaybackContext>,
}

/// POST /api/queue - Append a track
pub async fn enqueue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(request): ApiJson<EnqueueRequest>,
) -> Result<(StatusCode, Json<QueueItem>)> {
    let item = app_state
        .playback
        .enqueue(auth.user_id(), &request.track_id, request.context.as_ref())
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// POST /api/queue/dequeue - Consume the head without changing playback
pub async fn dequeue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Option<QueueItem>>> {
    Ok(Json(app_state.playback.dequeue(auth.user_id()).await?))
}

/// DELETE /api/queue/:item_id
pub async fn remove_from_queue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(item_id): Path<i64>,
) -> Result<StatusCode> {
    app_state
        .playback
        .remove_from_queue(auth.user_id(), QueueItemId::new(item_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub removed: u64,
}

/// DELETE /api/queue - Remove every queued track
pub async fn clear_queue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<ClearResponse>> {
    let removed = app_state.playback.clear_queue(auth.user_id()).await?;
    Ok(Json(ClearResponse { removed }))
}
