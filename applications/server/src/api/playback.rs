/// Playback session API routes
use crate::{error::Result, extract::ApiJson, middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use cadence_core::types::{RepeatMode, SessionView};
use cadence_playback::StartPlayback;
use serde::Deserialize;

/// GET /api/playback - Current session, `null` when nothing is playing
pub async fn get_playback(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Option<SessionView>>> {
    let view = app_state.playback.current(auth.user_id()).await?;
    Ok(Json(view))
}

/// POST /api/playback/play - Load a track and start playing
pub async fn play(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(request): ApiJson<StartPlayback>,
) -> Result<Json<SessionView>> {
    let view = app_state.playback.start(auth.user_id(), request).await?;
    Ok(Json(view))
}

/// POST /api/playback/resume
pub async fn resume(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<SessionView>> {
    Ok(Json(app_state.playback.resume(auth.user_id()).await?))
}

/// POST /api/playback/pause
pub async fn pause(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<SessionView>> {
    Ok(Json(app_state.playback.pause(auth.user_id()).await?))
}

#[derive(Debug, Deserialize)]
pub struct SeekCommand {
    pub position_ms: i64,
}

/// POST /api/playback/seek
pub async fn seek(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(cmd): ApiJson<SeekCommand>,
) -> Result<Json<SessionView>> {
    let view = app_state
        .playback
        .seek(auth.user_id(), cmd.position_ms)
        .await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct VolumeCommand {
    pub volume_percent: i64,
}

/// POST /api/playback/volume
pub async fn set_volume(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(cmd): ApiJson<VolumeCommand>,
) -> Result<Json<SessionView>> {
    let view = app_state
        .playback
        .set_volume(auth.user_id(), cmd.volume_percent)
        .await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct ShuffleCommand {
    pub shuffle: bool,
}

/// POST /api/playback/shuffle
pub async fn set_shuffle(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(cmd): ApiJson<ShuffleCommand>,
) -> Result<Json<SessionView>> {
    let view = app_state
        .playback
        .set_shuffle(auth.user_id(), cmd.shuffle)
        .await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct RepeatCommand {
    pub repeat: String,
}

/// POST /api/playback/repeat - `off`, `track` or `context`
pub async fn set_repeat(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(cmd): ApiJson<RepeatCommand>,
) -> Result<Json<SessionView>> {
    let repeat: RepeatMode = cmd.repeat.parse()?;
    let view = app_state.playback.set_repeat(auth.user_id(), repeat).await?;
    Ok(Json(view))
}

/// POST /api/playback/next
pub async fn next(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<SessionView>> {
    Ok(Json(app_state.playback.next(auth.user_id()).await?))
}

/// POST /api/playback/previous
pub async fn previous(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<SessionView>> {
    Ok(Json(app_state.playback.previous(auth.user_id()).await?))
}

#[derive(Debug, Deserialize)]
pub struct TransferCommand {
    pub device_name: String,
}

/// POST /api/playback/transfer
pub async fn transfer(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(cmd): ApiJson<TransferCommand>,
) -> Result<Json<SessionView>> {
    let view = app_state
        .playback
        .transfer_device(auth.user_id(), cmd.device_name)
        .await?;
    Ok(Json(view))
}

/// DELETE /api/playback - Stop and discard the session
pub async fn stop(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state.playback.stop(auth.user_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
