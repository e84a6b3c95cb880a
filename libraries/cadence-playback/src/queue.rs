//! Manual queue
//!
//! An explicit per-user list of tracks to play next. It always pre-empts
//! context navigation and is consumed head-first by `next`.

use cadence_core::{
    types::{PlaybackContext, QueueEntry, QueueItem, QueueItemId, TrackId, UserId},
    CadenceError, CatalogReader, QueueStore, Result,
};

pub struct ManualQueue<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: QueueStore + CatalogReader + ?Sized> ManualQueue<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Append a track; fails with `TrackNotFound` for unknown tracks
    pub async fn enqueue(
        &self,
        user_id: &UserId,
        track_id: &TrackId,
        context: Option<&PlaybackContext>,
    ) -> Result<QueueItem> {
        if self.store.get_track(track_id).await?.is_none() {
            return Err(CadenceError::TrackNotFound(track_id.clone()));
        }

        self.store.append_to_queue(user_id, track_id, context).await
    }

    /// The item `next` would play, left in the queue
    pub async fn peek_head(&self, user_id: &UserId) -> Result<Option<QueueItem>> {
        self.store.peek_queue_head(user_id).await
    }

    /// Consume the lowest-position item
    pub async fn dequeue_head(&self, user_id: &UserId) -> Result<Option<QueueItem>> {
        let head = self.store.take_queue_head(user_id).await?;

        if let Some(item) = &head {
            tracing::debug!(
                %user_id,
                item_id = %item.id,
                track_id = %item.track_id,
                "consumed queue head"
            );
        }

        Ok(head)
    }

    pub async fn remove(&self, user_id: &UserId, item_id: QueueItemId) -> Result<()> {
        if self.store.remove_from_queue(user_id, item_id).await? {
            Ok(())
        } else {
            Err(CadenceError::QueueItemNotFound(item_id))
        }
    }

    /// Returns the number of removed items
    pub async fn clear(&self, user_id: &UserId) -> Result<u64> {
        self.store.clear_queue(user_id).await
    }

    pub async fn list(&self, user_id: &UserId, limit: i64) -> Result<Vec<QueueEntry>> {
        self.store.list_queue(user_id, limit).await
    }
}
