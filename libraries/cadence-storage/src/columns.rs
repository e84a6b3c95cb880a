//! Column encodings shared by the slices

use cadence_core::{error::Result, types::*};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Timestamps are stored as Unix milliseconds
pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

pub(crate) fn now_millis() -> i64 {
    to_millis(Utc::now())
}

/// Split a context into its `(context_type, context_id)` columns
pub(crate) fn context_columns(
    context: Option<&PlaybackContext>,
) -> (Option<&'static str>, Option<String>) {
    match context {
        Some(ctx) => (Some(ctx.context_type.as_str()), Some(ctx.id.clone())),
        None => (None, None),
    }
}

/// Rebuild a context from its columns; a half-filled pair reads as no context
pub(crate) fn context_from_columns(
    context_type: Option<String>,
    context_id: Option<String>,
) -> Result<Option<PlaybackContext>> {
    match (context_type, context_id) {
        (Some(kind), Some(id)) => Ok(Some(PlaybackContext::new(kind.parse()?, id))),
        _ => Ok(None),
    }
}

/// Track columns selected with their display joins.
///
/// Rows built from this projection decode with [`track_from_row`].
pub(crate) const TRACK_COLUMNS: &str = "t.id AS id, t.title AS title, t.artist_id AS artist_id, \
     ar.name AS artist_name, t.album_id AS album_id, al.title AS album_title, \
     t.track_number AS track_number, t.duration_seconds AS duration_seconds, \
     t.play_count AS play_count";

pub(crate) const TRACK_JOINS: &str =
    "LEFT JOIN artists ar ON ar.id = t.artist_id LEFT JOIN albums al ON al.id = t.album_id";

pub(crate) fn track_from_row(row: &SqliteRow) -> Result<Track> {
    Ok(Track {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist_id: row.try_get("artist_id")?,
        artist_name: row.try_get("artist_name")?,
        album_id: row.try_get("album_id")?,
        album_title: row.try_get("album_title")?,
        track_number: row.try_get("track_number")?,
        duration_seconds: row.try_get("duration_seconds")?,
        play_count: row.try_get("play_count")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_round_trip_keeps_millisecond_precision() {
        let at = from_millis(1_700_000_123_456);
        assert_eq!(to_millis(at), 1_700_000_123_456);
    }

    #[test]
    fn context_columns_round_trip() {
        let ctx = PlaybackContext::playlist("pl-9");
        let (kind, id) = context_columns(Some(&ctx));
        let back = context_from_columns(kind.map(str::to_string), id).unwrap();
        assert_eq!(back, Some(ctx));
    }

    #[test]
    fn half_filled_context_reads_as_none() {
        let back = context_from_columns(Some("album".to_string()), None).unwrap();
        assert_eq!(back, None);
    }
}
