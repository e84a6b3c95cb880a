//! Append-only play history

use crate::columns::{from_millis, to_millis};
use crate::tracks;
use cadence_core::{error::Result, types::*};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

/// Whether the user played the track at or after `since`
pub async fn has_play_since(
    pool: &SqlitePool,
    user_id: &UserId,
    track_id: &TrackId,
    since: DateTime<Utc>,
) -> Result<bool> {
    let row = sqlx::query(
        r#"
        SELECT 1 FROM play_history
        WHERE user_id = ? AND track_id = ? AND played_at >= ?
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(track_id)
    .bind(to_millis(since))
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Append a history row, bumping the track's counter when the play counts
pub async fn append(pool: &SqlitePool, play: &NewPlay) -> Result<PlayHistoryEntry> {
    let mut tx = pool.begin().await?;
    let entry = append_on(&mut tx, play).await?;
    tx.commit().await?;

    Ok(entry)
}

pub(crate) async fn append_on(
    conn: &mut SqliteConnection,
    play: &NewPlay,
) -> Result<PlayHistoryEntry> {
    let row = sqlx::query(
        r#"
        INSERT INTO play_history (user_id, track_id, played_at, play_duration_seconds)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, track_id, played_at, play_duration_seconds
        "#,
    )
    .bind(&play.user_id)
    .bind(&play.track_id)
    .bind(to_millis(play.played_at))
    .bind(play.play_duration_seconds)
    .fetch_one(&mut *conn)
    .await?;

    if play.counted {
        tracks::increment_play_count_on(conn, &play.track_id).await?;
    }

    entry_from_row(&row)
}

/// Most recent plays, newest first
pub async fn recent(
    pool: &SqlitePool,
    user_id: &UserId,
    limit: i64,
) -> Result<Vec<PlayHistoryEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, track_id, played_at, play_duration_seconds
        FROM play_history
        WHERE user_id = ?
        ORDER BY played_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(entry_from_row).collect()
}

fn entry_from_row(row: &SqliteRow) -> Result<PlayHistoryEntry> {
    Ok(PlayHistoryEntry {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        track_id: row.try_get("track_id")?,
        played_at: from_millis(row.try_get("played_at")?),
        play_duration_seconds: row.try_get("play_duration_seconds")?,
    })
}
