use crate::columns::now_millis;
use cadence_core::{error::Result, types::*};
use sqlx::{Row, SqlitePool};

pub async fn get_by_id(pool: &SqlitePool, id: &AlbumId) -> Result<Option<Album>> {
    let row = sqlx::query("SELECT id, title, artist_id FROM albums WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|row| {
        Ok(Album {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            artist_id: row.try_get("artist_id")?,
        })
    })
    .transpose()
}

pub async fn create(pool: &SqlitePool, album: CreateAlbum) -> Result<Album> {
    let id = AlbumId::generate();

    sqlx::query("INSERT INTO albums (id, title, artist_id, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&album.title)
        .bind(&album.artist_id)
        .bind(now_millis())
        .execute(pool)
        .await?;

    Ok(Album {
        id,
        title: album.title,
        artist_id: album.artist_id,
    })
}

/// Track ids of an album in playing order.
///
/// Tracks without a track number sort after numbered ones, oldest first.
pub async fn ordered_track_ids(pool: &SqlitePool, album_id: &AlbumId) -> Result<Vec<TrackId>> {
    let rows = sqlx::query(
        r#"
        SELECT id
        FROM tracks
        WHERE album_id = ?
        ORDER BY track_number IS NULL, track_number, created_at, id
        "#,
    )
    .bind(album_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| row.try_get("id").map_err(Into::into))
        .collect()
}
