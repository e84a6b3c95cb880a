/// Core error types for Cadence
use crate::types::{PlaylistId, QueueItemId, TrackId};
use thiserror::Error;

/// Result type alias using `CadenceError`
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Failure categories surfaced to callers of the playback core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    Conflict,
    PermissionDenied,
    Internal,
}

/// Core error type for Cadence
#[derive(Error, Debug)]
pub enum CadenceError {
    /// The user has no playback session
    #[error("No active playback")]
    NoActivePlayback,

    /// Neither the queue nor the context yields a next track
    #[error("No next track")]
    NoNextTrack,

    /// The context yields no previous track
    #[error("No previous track")]
    NoPreviousTrack,

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Queue item not found for this user
    #[error("Queue item not found: {0}")]
    QueueItemNotFound(QueueItemId),

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Out-of-range or malformed input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Duplicate or otherwise conflicting write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Permission denied
    #[error("Permission denied")]
    PermissionDenied,

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl CadenceError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Category of this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoActivePlayback
            | Self::NoNextTrack
            | Self::NoPreviousTrack
            | Self::TrackNotFound(_)
            | Self::QueueItemNotFound(_)
            | Self::PlaylistNotFound(_)
            | Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::Storage(_) | Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoActivePlayback => "NO_ACTIVE_PLAYBACK",
            Self::NoNextTrack => "NO_NEXT_TRACK",
            Self::NoPreviousTrack => "NO_PREVIOUS_TRACK",
            Self::TrackNotFound(_) => "TRACK_NOT_FOUND",
            Self::QueueItemNotFound(_) => "QUEUE_ITEM_NOT_FOUND",
            Self::PlaylistNotFound(_) => "PLAYLIST_NOT_FOUND",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Conflict(_) => "CONFLICT",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Storage(_) | Self::Database(_) => "INTERNAL",
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for CadenceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_failures_are_not_found() {
        assert_eq!(CadenceError::NoNextTrack.kind(), ErrorKind::NotFound);
        assert_eq!(CadenceError::NoPreviousTrack.kind(), ErrorKind::NotFound);
        assert_eq!(CadenceError::NoActivePlayback.kind(), ErrorKind::NotFound);
        assert_eq!(CadenceError::NoActivePlayback.code(), "NO_ACTIVE_PLAYBACK");
    }

    #[test]
    fn storage_failures_are_internal() {
        assert_eq!(
            CadenceError::Database("locked".to_string()).kind(),
            ErrorKind::Internal
        );
    }
}
