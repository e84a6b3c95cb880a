use crate::{albums, play_history, playlists, queue, sessions, tracks};
use async_trait::async_trait;
use cadence_core::{
    error::Result,
    storage::{CatalogReader, PlayHistoryStore, QueueStore, SessionStore},
    types::*,
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// `SQLite`-backed store handle for the playback engine.
///
/// Cheap to clone; every clone shares the same pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CatalogReader for SqliteStore {
    async fn get_track(&self, id: &TrackId) -> Result<Option<Track>> {
        tracks::get_by_id(&self.pool, id).await
    }

    async fn get_ordered_album_tracks(&self, album_id: &AlbumId) -> Result<Vec<TrackId>> {
        albums::ordered_track_ids(&self.pool, album_id).await
    }

    async fn get_ordered_playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
    ) -> Result<Vec<PlaylistEntry>> {
        playlists::get_entries(&self.pool, playlist_id).await
    }

    async fn get_context_name(&self, context: &PlaybackContext) -> Result<Option<String>> {
        match context.context_type {
            ContextType::Album => {
                let album = albums::get_by_id(&self.pool, &AlbumId::new(context.id.as_str())).await?;
                Ok(album.map(|a| a.title))
            }
            ContextType::Playlist => {
                let playlist =
                    playlists::get_by_id(&self.pool, &PlaylistId::new(context.id.as_str())).await?;
                Ok(playlist.map(|p| p.name))
            }
            ContextType::Artist | ContextType::Search => Ok(None),
        }
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn get_session(&self, user_id: &UserId) -> Result<Option<PlaybackSession>> {
        sessions::get(&self.pool, user_id).await
    }

    async fn save_session(&self, session: &PlaybackSession) -> Result<()> {
        sessions::upsert(&self.pool, session).await
    }

    async fn delete_session(&self, user_id: &UserId) -> Result<bool> {
        sessions::delete(&self.pool, user_id).await
    }

    async fn commit_advance(&self, advance: &SessionAdvance) -> Result<()> {
        sessions::commit_advance(&self.pool, advance).await
    }
}

#[async_trait]
impl QueueStore for SqliteStore {
    async fn append_to_queue(
        &self,
        user_id: &UserId,
        track_id: &TrackId,
        context: Option<&PlaybackContext>,
    ) -> Result<QueueItem> {
        queue::append(&self.pool, user_id, track_id, context).await
    }

    async fn peek_queue_head(&self, user_id: &UserId) -> Result<Option<QueueItem>> {
        queue::peek_head(&self.pool, user_id).await
    }

    async fn take_queue_head(&self, user_id: &UserId) -> Result<Option<QueueItem>> {
        queue::take_head(&self.pool, user_id).await
    }

    async fn remove_from_queue(&self, user_id: &UserId, item_id: QueueItemId) -> Result<bool> {
        queue::remove(&self.pool, user_id, item_id).await
    }

    async fn clear_queue(&self, user_id: &UserId) -> Result<u64> {
        queue::clear(&self.pool, user_id).await
    }

    async fn list_queue(&self, user_id: &UserId, limit: i64) -> Result<Vec<QueueEntry>> {
        queue::list(&self.pool, user_id, limit).await
    }
}

#[async_trait]
impl PlayHistoryStore for SqliteStore {
    async fn has_play_since(
        &self,
        user_id: &UserId,
        track_id: &TrackId,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        play_history::has_play_since(&self.pool, user_id, track_id, since).await
    }

    async fn append_play(&self, play: &NewPlay) -> Result<PlayHistoryEntry> {
        play_history::append(&self.pool, play).await
    }

    async fn recent_plays(&self, user_id: &UserId, limit: i64) -> Result<Vec<PlayHistoryEntry>> {
        play_history::recent(&self.pool, user_id, limit).await
    }
}
