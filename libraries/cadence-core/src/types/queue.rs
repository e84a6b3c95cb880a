/// Manual queue types
use crate::types::{PlaybackContext, QueueItemId, Track, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One explicitly queued track.
///
/// Positions are dense and 1-based per user; the lowest position plays next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: QueueItemId,
    pub user_id: UserId,
    pub track_id: TrackId,
    pub position: i64,
    pub added_at: DateTime<Utc>,
    pub context: Option<PlaybackContext>,
}

/// Queue item joined with its track's display data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    #[serde(flatten)]
    pub item: QueueItem,
    pub track: Track,
}
