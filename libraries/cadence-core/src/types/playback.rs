/// Playback session types
use crate::error::CadenceError;
use crate::types::{NewPlay, QueueItemId, Track, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Repeat mode for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    /// `next` replays the current track
    Track,
    /// Sequential navigation wraps from the last context track to the first
    Context,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Track => "track",
            Self::Context => "context",
        }
    }
}

impl FromStr for RepeatMode {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "track" => Ok(Self::Track),
            "context" => Ok(Self::Context),
            other => Err(CadenceError::invalid_argument(format!(
                "repeat mode must be one of off, track, context (got {other:?})"
            ))),
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of collection a session is playing from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    Album,
    Playlist,
    Artist,
    Search,
}

impl ContextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::Album => "album",
            ContextType::Playlist => "playlist",
            ContextType::Artist => "artist",
            ContextType::Search => "search",
        }
    }
}

impl FromStr for ContextType {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "album" => Ok(ContextType::Album),
            "playlist" => Ok(ContextType::Playlist),
            "artist" => Ok(ContextType::Artist),
            "search" => Ok(ContextType::Search),
            other => Err(CadenceError::invalid_argument(format!(
                "unknown context type {other:?}"
            ))),
        }
    }
}

/// The collection framing next/previous navigation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybackContext {
    #[serde(rename = "type")]
    pub context_type: ContextType,
    pub id: String,
}

impl PlaybackContext {
    pub fn new(context_type: ContextType, id: impl Into<String>) -> Self {
        Self {
            context_type,
            id: id.into(),
        }
    }

    pub fn album(id: impl Into<String>) -> Self {
        Self::new(ContextType::Album, id)
    }

    pub fn playlist(id: impl Into<String>) -> Self {
        Self::new(ContextType::Playlist, id)
    }
}

/// A listener's current playback record.
///
/// At most one exists per user. A missing session means nothing is playing,
/// which is different from a paused session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSession {
    pub user_id: UserId,
    pub track_id: TrackId,
    pub context: Option<PlaybackContext>,
    pub is_playing: bool,
    /// Always within `0..=track duration`
    pub position_ms: i64,
    /// Always within `0..=100`
    pub volume_percent: u8,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub device_name: String,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl PlaybackSession {
    /// Point the session at a new track, rewound and playing
    pub fn load_track(&mut self, track_id: TrackId) {
        self.track_id = track_id;
        self.position_ms = 0;
        self.is_playing = true;
    }

    /// Stamp the session as mutated now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A session joined with display data for its track and context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: PlaybackSession,
    /// `None` only if the track vanished from the catalog after it was loaded
    pub track: Option<Track>,
    /// Album title or playlist name; artist/search contexts have none
    pub context_name: Option<String>,
}

/// Writes of one `next`/`previous` step.
///
/// A store applies all of them or none: the session points at the new track,
/// the consumed queue item is gone and the implied listen is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAdvance {
    pub session: PlaybackSession,
    /// Queue item the new track was taken from
    pub consumed_queue_item: Option<QueueItemId>,
    pub play: NewPlay,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_mode_round_trips_through_strings() {
        for mode in [RepeatMode::Off, RepeatMode::Track, RepeatMode::Context] {
            assert_eq!(mode.as_str().parse::<RepeatMode>().unwrap(), mode);
        }
    }

    #[test]
    fn repeat_mode_rejects_unknown_values() {
        let err = "all".parse::<RepeatMode>().unwrap_err();
        assert!(matches!(err, CadenceError::InvalidArgument(_)));
    }

    #[test]
    fn context_serializes_with_type_tag() {
        let json = serde_json::to_value(PlaybackContext::album("al-1")).unwrap();
        assert_eq!(json["type"], "album");
        assert_eq!(json["id"], "al-1");
    }

    #[test]
    fn load_track_rewinds_and_plays() {
        let mut session = PlaybackSession {
            user_id: UserId::new("u"),
            track_id: TrackId::new("a"),
            context: None,
            is_playing: false,
            position_ms: 12_000,
            volume_percent: 50,
            shuffle: false,
            repeat: RepeatMode::Off,
            device_name: "Kitchen".to_string(),
            updated_at: Utc::now(),
        };

        session.load_track(TrackId::new("b"));

        assert_eq!(session.track_id, TrackId::new("b"));
        assert_eq!(session.position_ms, 0);
        assert!(session.is_playing);
    }
}
