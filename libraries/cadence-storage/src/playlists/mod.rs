//! Playlists and their dense track positions
//!
//! Every operation that moves positions runs in one transaction whose first
//! statement is a write, so SQLite hands out the writer lock before any
//! position is read and the list is never observed with gaps or duplicates.

use crate::columns::{from_millis, now_millis};
use cadence_core::{error::Result, types::*, CadenceError};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

/// Create new playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let id = PlaylistId::generate();
    let now = now_millis();

    sqlx::query(
        "INSERT INTO playlists (id, name, owner_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&playlist.name)
    .bind(&playlist.owner_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| CadenceError::storage("Failed to retrieve created playlist"))
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        "SELECT id, name, owner_id, created_at, updated_at FROM playlists WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(Playlist {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            owner_id: row.try_get("owner_id")?,
            created_at: from_millis(row.try_get("created_at")?),
            updated_at: from_millis(row.try_get("updated_at")?),
        })
    })
    .transpose()
}

/// Playlist membership ordered by position
pub async fn get_entries(pool: &SqlitePool, id: &PlaylistId) -> Result<Vec<PlaylistEntry>> {
    let rows = sqlx::query(
        "SELECT track_id, position FROM playlist_tracks WHERE playlist_id = ? ORDER BY position",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(PlaylistEntry {
                track_id: row.try_get("track_id")?,
                position: row.try_get("position")?,
            })
        })
        .collect()
}

/// Append a track at `max(position) + 1`
pub async fn add_track(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
    user_id: &UserId,
) -> Result<PlaylistEntry> {
    let mut tx = pool.begin().await?;
    begin_owner_write(&mut tx, playlist_id, user_id).await?;

    let track_exists = sqlx::query("SELECT 1 FROM tracks WHERE id = ?")
        .bind(track_id)
        .fetch_optional(&mut *tx)
        .await?
        .is_some();
    if !track_exists {
        return Err(CadenceError::TrackNotFound(track_id.clone()));
    }

    let already_present =
        sqlx::query("SELECT 1 FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
            .bind(playlist_id)
            .bind(track_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
    if already_present {
        return Err(CadenceError::conflict(format!(
            "track {track_id} is already in playlist {playlist_id}"
        )));
    }

    let row = sqlx::query(
        r#"
        INSERT INTO playlist_tracks (playlist_id, track_id, position, added_at)
        SELECT ?, ?, COALESCE(MAX(position), 0) + 1, ?
        FROM playlist_tracks
        WHERE playlist_id = ?
        RETURNING position
        "#,
    )
    .bind(playlist_id)
    .bind(track_id)
    .bind(now_millis())
    .bind(playlist_id)
    .fetch_one(&mut *tx)
    .await?;

    let position: i64 = row.try_get("position")?;

    tx.commit().await?;

    tracing::debug!(%playlist_id, %track_id, position, "track added to playlist");

    Ok(PlaylistEntry {
        track_id: track_id.clone(),
        position,
    })
}

/// Remove a track and close the gap it leaves
pub async fn remove_track(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
    user_id: &UserId,
) -> Result<()> {
    let mut tx = pool.begin().await?;
    begin_owner_write(&mut tx, playlist_id, user_id).await?;

    let removed = sqlx::query(
        "DELETE FROM playlist_tracks WHERE playlist_id = ? AND track_id = ? RETURNING position",
    )
    .bind(playlist_id)
    .bind(track_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(removed) = removed else {
        return Err(CadenceError::not_found(
            "Playlist track",
            format!("{playlist_id}/{track_id}"),
        ));
    };
    let removed_position: i64 = removed.try_get("position")?;

    sqlx::query(
        "UPDATE playlist_tracks SET position = position - 1 WHERE playlist_id = ? AND position > ?",
    )
    .bind(playlist_id)
    .bind(removed_position)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(%playlist_id, %track_id, removed_position, "track removed from playlist");

    Ok(())
}

/// Move a track to `new_position` (1-based), shifting the tracks in between
pub async fn reorder_track(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
    new_position: i64,
    user_id: &UserId,
) -> Result<()> {
    let mut tx = pool.begin().await?;
    begin_owner_write(&mut tx, playlist_id, user_id).await?;

    let current = sqlx::query(
        "SELECT position FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?",
    )
    .bind(playlist_id)
    .bind(track_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current else {
        return Err(CadenceError::not_found(
            "Playlist track",
            format!("{playlist_id}/{track_id}"),
        ));
    };
    let old_position: i64 = current.try_get("position")?;

    let len: i64 = sqlx::query("SELECT COUNT(*) AS len FROM playlist_tracks WHERE playlist_id = ?")
        .bind(playlist_id)
        .fetch_one(&mut *tx)
        .await?
        .try_get("len")?;

    if !(1..=len).contains(&new_position) {
        return Err(CadenceError::invalid_argument(format!(
            "position must be between 1 and {len} (got {new_position})"
        )));
    }

    if old_position == new_position {
        return Ok(());
    }

    if old_position < new_position {
        // Moving toward the end: items in (old, new] move up one
        sqlx::query(
            r#"
            UPDATE playlist_tracks
            SET position = position - 1
            WHERE playlist_id = ? AND position > ? AND position <= ?
            "#,
        )
        .bind(playlist_id)
        .bind(old_position)
        .bind(new_position)
        .execute(&mut *tx)
        .await?;
    } else {
        // Moving toward the start: items in [new, old) move down one
        sqlx::query(
            r#"
            UPDATE playlist_tracks
            SET position = position + 1
            WHERE playlist_id = ? AND position >= ? AND position < ?
            "#,
        )
        .bind(playlist_id)
        .bind(new_position)
        .bind(old_position)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE playlist_tracks SET position = ? WHERE playlist_id = ? AND track_id = ?")
        .bind(new_position)
        .bind(playlist_id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!(%playlist_id, %track_id, old_position, new_position, "playlist track moved");

    Ok(())
}

/// Touch the playlist (taking the writer lock) and check the caller owns it
async fn begin_owner_write(
    tx: &mut Transaction<'_, Sqlite>,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> Result<()> {
    let row = sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ? RETURNING owner_id")
        .bind(now_millis())
        .bind(playlist_id)
        .fetch_optional(&mut **tx)
        .await?;

    let Some(row) = row else {
        return Err(CadenceError::PlaylistNotFound(playlist_id.clone()));
    };

    let owner_id: UserId = row.try_get("owner_id")?;
    if &owner_id != user_id {
        return Err(CadenceError::PermissionDenied);
    }

    Ok(())
}
