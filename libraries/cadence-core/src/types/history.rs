/// Play history types
use crate::types::{TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only record of a play attempt, counted or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayHistoryEntry {
    pub id: i64,
    pub user_id: UserId,
    pub track_id: TrackId,
    pub played_at: DateTime<Utc>,
    pub play_duration_seconds: Option<f64>,
}

/// Input for appending a history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlay {
    pub user_id: UserId,
    pub track_id: TrackId,
    pub played_at: DateTime<Utc>,
    pub play_duration_seconds: Option<f64>,
    /// Also bump the track's aggregate counter
    pub counted: bool,
}
