use crate::columns::{now_millis, track_from_row, TRACK_COLUMNS, TRACK_JOINS};
use cadence_core::{error::Result, types::*, CadenceError};
use sqlx::{Row, SqliteConnection, SqlitePool};

/// Get a track with its artist name and album title
pub async fn get_by_id(pool: &SqlitePool, id: &TrackId) -> Result<Option<Track>> {
    let sql = format!("SELECT {TRACK_COLUMNS} FROM tracks t {TRACK_JOINS} WHERE t.id = ?");

    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    row.as_ref().map(track_from_row).transpose()
}

/// Seed a track into the catalog
pub async fn create(pool: &SqlitePool, track: CreateTrack) -> Result<Track> {
    if track.duration_seconds < 0 {
        return Err(CadenceError::invalid_argument(
            "duration_seconds must not be negative",
        ));
    }

    let id = TrackId::generate();

    sqlx::query(
        r#"
        INSERT INTO tracks (id, title, artist_id, album_id, track_number, duration_seconds, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&track.title)
    .bind(&track.artist_id)
    .bind(&track.album_id)
    .bind(track.track_number)
    .bind(track.duration_seconds)
    .bind(now_millis())
    .execute(pool)
    .await?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| CadenceError::storage("Failed to retrieve created track"))
}

/// Bump the aggregate play counter
pub async fn increment_play_count(pool: &SqlitePool, id: &TrackId) -> Result<()> {
    let mut conn = pool.acquire().await?;
    increment_play_count_on(&mut conn, id).await
}

pub(crate) async fn increment_play_count_on(
    conn: &mut SqliteConnection,
    id: &TrackId,
) -> Result<()> {
    let result = sqlx::query("UPDATE tracks SET play_count = play_count + 1 WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::TrackNotFound(id.clone()));
    }

    Ok(())
}

/// Aggregate play counter of a track
pub async fn get_play_count(pool: &SqlitePool, id: &TrackId) -> Result<i64> {
    let row = sqlx::query("SELECT play_count FROM tracks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(row.try_get("play_count")?),
        None => Err(CadenceError::TrackNotFound(id.clone())),
    }
}
