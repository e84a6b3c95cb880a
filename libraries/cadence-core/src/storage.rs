//! Store traits the playback engine is written against
//!
//! Every component takes an explicit store handle implementing these traits;
//! state lives entirely in the store and is re-read at the start of each
//! command.

use crate::error::Result;
use crate::types::{
    AlbumId, NewPlay, PlayHistoryEntry, PlaybackContext, PlaybackSession, PlaylistEntry,
    PlaylistId, QueueEntry, QueueItem, QueueItemId, SessionAdvance, Track, TrackId, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read-only access to catalog membership and ordering
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Get a track with its display fields
    async fn get_track(&self, id: &TrackId) -> Result<Option<Track>>;

    /// Track ids of an album ordered by track number
    async fn get_ordered_album_tracks(&self, album_id: &AlbumId) -> Result<Vec<TrackId>>;

    /// Playlist membership ordered by position
    async fn get_ordered_playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
    ) -> Result<Vec<PlaylistEntry>>;

    /// Display name of a context (album title, playlist name)
    async fn get_context_name(&self, context: &PlaybackContext) -> Result<Option<String>>;
}

/// Persistence of the one-per-user playback session
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_session(&self, user_id: &UserId) -> Result<Option<PlaybackSession>>;

    /// Insert or replace the user's session
    async fn save_session(&self, session: &PlaybackSession) -> Result<()>;

    /// Returns whether a session existed
    async fn delete_session(&self, user_id: &UserId) -> Result<bool>;

    /// Apply one navigation step atomically.
    ///
    /// Fails with `QueueItemNotFound` if the consumed item is already gone;
    /// nothing is written in that case.
    async fn commit_advance(&self, advance: &SessionAdvance) -> Result<()>;
}

/// Persistence of the per-user manual queue.
///
/// Implementations keep positions dense (`1..=n`) after every call.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Append at `max(position) + 1`
    async fn append_to_queue(
        &self,
        user_id: &UserId,
        track_id: &TrackId,
        context: Option<&PlaybackContext>,
    ) -> Result<QueueItem>;

    /// The lowest-position item, left in place
    async fn peek_queue_head(&self, user_id: &UserId) -> Result<Option<QueueItem>>;

    /// Remove and return the lowest-position item
    async fn take_queue_head(&self, user_id: &UserId) -> Result<Option<QueueItem>>;

    /// Remove one item, closing the gap it leaves. Returns whether it existed.
    async fn remove_from_queue(&self, user_id: &UserId, item_id: QueueItemId) -> Result<bool>;

    /// Remove every item; returns how many were removed
    async fn clear_queue(&self, user_id: &UserId) -> Result<u64>;

    /// Items by ascending position, joined with track data
    async fn list_queue(&self, user_id: &UserId, limit: i64) -> Result<Vec<QueueEntry>>;
}

/// Append-only play history
#[async_trait]
pub trait PlayHistoryStore: Send + Sync {
    /// Whether the user has a recorded play of the track at or after `since`
    async fn has_play_since(
        &self,
        user_id: &UserId,
        track_id: &TrackId,
        since: DateTime<Utc>,
    ) -> Result<bool>;

    /// Append a row, bumping the track's counter in the same write when
    /// `play.counted` is set
    async fn append_play(&self, play: &NewPlay) -> Result<PlayHistoryEntry>;

    /// Newest first
    async fn recent_plays(&self, user_id: &UserId, limit: i64) -> Result<Vec<PlayHistoryEntry>>;
}

/// Everything the playback engine needs from a single store handle
pub trait PlaybackStore: CatalogReader + SessionStore + QueueStore + PlayHistoryStore {}

impl<T> PlaybackStore for T where T: CatalogReader + SessionStore + QueueStore + PlayHistoryStore {}
