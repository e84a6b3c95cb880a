//! Cadence Core
//!
//! Domain types, store traits, and error handling for the Cadence playback
//! engine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `PlaybackSession`, `QueueItem`, `PlayHistoryEntry`, catalog `Track`
//! - **Store Traits**: `CatalogReader`, `SessionStore`, `QueueStore`, `PlayHistoryStore`
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{PlaybackContext, RepeatMode};
//!
//! let context = PlaybackContext::album("album-1");
//! let repeat: RepeatMode = "context".parse().unwrap();
//! assert_eq!(repeat, RepeatMode::Context);
//! assert_eq!(context.id, "album-1");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, ErrorKind, Result};
pub use storage::{CatalogReader, PlayHistoryStore, PlaybackStore, QueueStore, SessionStore};

pub use types::{
    AlbumId, ArtistId, ContextType, PlayHistoryEntry, PlaybackContext, PlaybackSession,
    PlaylistId, QueueEntry, QueueItem, QueueItemId, RepeatMode, SessionAdvance, SessionView,
    Track, TrackId, UserId,
};
