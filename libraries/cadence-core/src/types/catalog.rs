/// Catalog types as seen by the playback engine
use crate::types::{AlbumId, ArtistId, PlaylistId, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog track with the display fields playback responses join in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist_id: Option<ArtistId>,
    pub artist_name: Option<String>,
    pub album_id: Option<AlbumId>,
    pub album_title: Option<String>,
    pub track_number: Option<i64>,
    pub duration_seconds: i64,
    /// Aggregate count of plays that passed the counting rules
    pub play_count: i64,
}

impl Track {
    /// Upper bound for a playback position on this track
    pub fn duration_ms(&self) -> i64 {
        self.duration_seconds.max(0) * 1000
    }
}

/// Input for seeding a track
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTrack {
    pub title: String,
    pub artist_id: Option<ArtistId>,
    pub album_id: Option<AlbumId>,
    pub track_number: Option<i64>,
    pub duration_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist_id: Option<ArtistId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlbum {
    pub title: String,
    pub artist_id: Option<ArtistId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub name: String,
    pub owner_id: UserId,
}

/// Membership row of a playlist; positions are dense and 1-based
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub track_id: TrackId,
    pub position: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_ms_is_seconds_times_thousand() {
        let track = Track {
            id: TrackId::new("t"),
            title: "Song".to_string(),
            artist_id: None,
            artist_name: None,
            album_id: None,
            album_title: None,
            track_number: None,
            duration_seconds: 40,
            play_count: 0,
        };
        assert_eq!(track.duration_ms(), 40_000);
    }
}
