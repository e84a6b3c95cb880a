//! Per-user manual queue
//!
//! Positions stay dense and 1-based. Appends compute `MAX(position) + 1`
//! inside the INSERT itself; removals delete and renumber the tail in one
//! transaction that begins with the DELETE.

use crate::columns::{
    context_columns, context_from_columns, from_millis, now_millis, track_from_row, TRACK_COLUMNS,
    TRACK_JOINS,
};
use cadence_core::{error::Result, types::*};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

const ITEM_COLUMNS: &str = "id, user_id, track_id, position, added_at, context_type, context_id";

/// Append a track at the end of the user's queue
pub async fn append(
    pool: &SqlitePool,
    user_id: &UserId,
    track_id: &TrackId,
    context: Option<&PlaybackContext>,
) -> Result<QueueItem> {
    let (context_type, context_id) = context_columns(context);

    let sql = format!(
        r#"
        INSERT INTO queue_items (user_id, track_id, position, added_at, context_type, context_id)
        SELECT ?, ?, COALESCE(MAX(position), 0) + 1, ?, ?, ?
        FROM queue_items
        WHERE user_id = ?
        RETURNING {ITEM_COLUMNS}
        "#
    );

    let row = sqlx::query(&sql)
        .bind(user_id)
        .bind(track_id)
        .bind(now_millis())
        .bind(context_type)
        .bind(context_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let item = item_from_row(&row)?;
    tracing::debug!(%user_id, %track_id, position = item.position, "queued track");
    Ok(item)
}

/// The lowest-position item without removing it
pub async fn peek_head(pool: &SqlitePool, user_id: &UserId) -> Result<Option<QueueItem>> {
    let sql = format!(
        r#"
        SELECT {ITEM_COLUMNS} FROM queue_items
        WHERE user_id = ?
        ORDER BY position, id
        LIMIT 1
        "#
    );

    let row = sqlx::query(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(item_from_row).transpose()
}

/// Remove and return the lowest-position item, shifting the rest up
pub async fn take_head(pool: &SqlitePool, user_id: &UserId) -> Result<Option<QueueItem>> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        r#"
        DELETE FROM queue_items
        WHERE id = (
            SELECT id FROM queue_items
            WHERE user_id = ?
            ORDER BY position, id
            LIMIT 1
        )
        RETURNING {ITEM_COLUMNS}
        "#
    );

    let row = sqlx::query(&sql)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let item = item_from_row(&row)?;

    close_gap(&mut tx, user_id, item.position).await?;
    tx.commit().await?;

    Ok(Some(item))
}

/// Remove one of the user's items. Returns whether it existed.
pub async fn remove(pool: &SqlitePool, user_id: &UserId, item_id: QueueItemId) -> Result<bool> {
    let mut tx = pool.begin().await?;

    if !remove_on(&mut tx, user_id, item_id).await? {
        return Ok(false);
    }

    tx.commit().await?;
    Ok(true)
}

/// Delete an item and close its gap on a caller-owned transaction
pub(crate) async fn remove_on(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    item_id: QueueItemId,
) -> Result<bool> {
    let row = sqlx::query("DELETE FROM queue_items WHERE id = ? AND user_id = ? RETURNING position")
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(false);
    };
    let position: i64 = row.try_get("position")?;

    close_gap(conn, user_id, position).await?;
    Ok(true)
}

/// Remove every item in the user's queue
pub async fn clear(pool: &SqlitePool, user_id: &UserId) -> Result<u64> {
    let result = sqlx::query("DELETE FROM queue_items WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Items by ascending position with their track data
pub async fn list(pool: &SqlitePool, user_id: &UserId, limit: i64) -> Result<Vec<QueueEntry>> {
    let sql = format!(
        r#"
        SELECT q.id AS queue_id, q.user_id AS queue_user_id, q.position AS position,
               q.added_at AS added_at, q.context_type AS context_type,
               q.context_id AS context_id, {TRACK_COLUMNS}
        FROM queue_items q
        JOIN tracks t ON t.id = q.track_id
        {TRACK_JOINS}
        WHERE q.user_id = ?
        ORDER BY q.position, q.id
        LIMIT ?
        "#
    );

    let rows = sqlx::query(&sql)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| {
            let track = track_from_row(row)?;
            let item = QueueItem {
                id: row.try_get("queue_id")?,
                user_id: row.try_get("queue_user_id")?,
                track_id: track.id.clone(),
                position: row.try_get("position")?,
                added_at: from_millis(row.try_get("added_at")?),
                context: context_from_columns(
                    row.try_get("context_type")?,
                    row.try_get("context_id")?,
                )?,
            };
            Ok(QueueEntry { item, track })
        })
        .collect()
}

/// Number of items in the user's queue
pub async fn len(pool: &SqlitePool, user_id: &UserId) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS len FROM queue_items WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.try_get("len")?)
}

async fn close_gap(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    removed_position: i64,
) -> Result<()> {
    sqlx::query("UPDATE queue_items SET position = position - 1 WHERE user_id = ? AND position > ?")
        .bind(user_id)
        .bind(removed_position)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

fn item_from_row(row: &SqliteRow) -> Result<QueueItem> {
    Ok(QueueItem {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        track_id: row.try_get("track_id")?,
        position: row.try_get("position")?,
        added_at: from_millis(row.try_get("added_at")?),
        context: context_from_columns(row.try_get("context_type")?, row.try_get("context_id")?)?,
    })
}
