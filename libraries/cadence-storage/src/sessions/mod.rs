//! Per-user playback session persistence

use crate::columns::{context_columns, context_from_columns, from_millis, to_millis};
use crate::{play_history, queue};
use cadence_core::{error::Result, types::*, CadenceError};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

/// Get the user's session, if one exists
pub async fn get(pool: &SqlitePool, user_id: &UserId) -> Result<Option<PlaybackSession>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, track_id, context_type, context_id, is_playing, position_ms,
               volume_percent, shuffle, repeat_mode, device_name, updated_at
        FROM playback_sessions
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(session_from_row).transpose()
}

/// Insert or replace the user's session
pub async fn upsert(pool: &SqlitePool, session: &PlaybackSession) -> Result<()> {
    let mut conn = pool.acquire().await?;
    upsert_on(&mut conn, session).await
}

/// Apply a navigation step in one transaction.
///
/// The session write goes first so the transaction holds the write lock
/// before it touches the queue. Any failure rolls back every write.
pub async fn commit_advance(pool: &SqlitePool, advance: &SessionAdvance) -> Result<()> {
    let user_id = &advance.session.user_id;
    let mut tx = pool.begin().await?;

    upsert_on(&mut tx, &advance.session).await?;

    if let Some(item_id) = advance.consumed_queue_item {
        if !queue::remove_on(&mut tx, user_id, item_id).await? {
            return Err(CadenceError::QueueItemNotFound(item_id));
        }
    }

    play_history::append_on(&mut tx, &advance.play).await?;

    tx.commit().await?;

    tracing::debug!(
        %user_id,
        track_id = %advance.session.track_id,
        consumed_queue_item = ?advance.consumed_queue_item,
        counted = advance.play.counted,
        "session advanced"
    );
    Ok(())
}

async fn upsert_on(conn: &mut SqliteConnection, session: &PlaybackSession) -> Result<()> {
    let (context_type, context_id) = context_columns(session.context.as_ref());

    sqlx::query(
        r#"
        INSERT INTO playback_sessions (
            user_id, track_id, context_type, context_id, is_playing, position_ms,
            volume_percent, shuffle, repeat_mode, device_name, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            track_id = excluded.track_id,
            context_type = excluded.context_type,
            context_id = excluded.context_id,
            is_playing = excluded.is_playing,
            position_ms = excluded.position_ms,
            volume_percent = excluded.volume_percent,
            shuffle = excluded.shuffle,
            repeat_mode = excluded.repeat_mode,
            device_name = excluded.device_name,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&session.user_id)
    .bind(&session.track_id)
    .bind(context_type)
    .bind(context_id)
    .bind(session.is_playing)
    .bind(session.position_ms)
    .bind(i64::from(session.volume_percent))
    .bind(session.shuffle)
    .bind(session.repeat.as_str())
    .bind(&session.device_name)
    .bind(to_millis(session.updated_at))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Delete the user's session. Returns whether one existed.
pub async fn delete(pool: &SqlitePool, user_id: &UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM playback_sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn session_from_row(row: &SqliteRow) -> Result<PlaybackSession> {
    let repeat: String = row.try_get("repeat_mode")?;
    let volume: i64 = row.try_get("volume_percent")?;

    Ok(PlaybackSession {
        user_id: row.try_get("user_id")?,
        track_id: row.try_get("track_id")?,
        context: context_from_columns(row.try_get("context_type")?, row.try_get("context_id")?)?,
        is_playing: row.try_get("is_playing")?,
        position_ms: row.try_get("position_ms")?,
        volume_percent: volume.clamp(0, 100) as u8,
        shuffle: row.try_get("shuffle")?,
        repeat: repeat.parse()?,
        device_name: row.try_get("device_name")?,
        updated_at: from_millis(row.try_get("updated_at")?),
    })
}
