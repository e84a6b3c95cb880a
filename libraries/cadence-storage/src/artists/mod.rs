use crate::columns::now_millis;
use cadence_core::{error::Result, types::*};
use sqlx::{Row, SqlitePool};

pub async fn get_by_id(pool: &SqlitePool, id: &ArtistId) -> Result<Option<Artist>> {
    let row = sqlx::query("SELECT id, name FROM artists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|row| {
        Ok(Artist {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    })
    .transpose()
}

pub async fn create(pool: &SqlitePool, name: &str) -> Result<Artist> {
    let id = ArtistId::generate();

    sqlx::query("INSERT INTO artists (id, name, created_at) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(now_millis())
        .execute(pool)
        .await?;

    Ok(Artist {
        id,
        name: name.to_string(),
    })
}
