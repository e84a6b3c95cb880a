//! Cadence - Playback Engine
//!
//! Per-user "now playing" state for the Cadence backend.
//!
//! This crate provides:
//! - The playback session state machine (start, pause, seek, next, stop, ...)
//! - A manual queue that always pre-empts context navigation
//! - Sequential and shuffled navigation over album and playlist contexts
//! - Play history recording with de-duplicated play counting
//!
//! # Architecture
//!
//! `cadence-playback` holds no long-lived per-user state. Every command
//! re-reads the session from a store implementing
//! [`cadence_core::PlaybackStore`] and writes it back under a per-user lock.
//! `cadence-storage` provides the `SQLite` store.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::{PlaybackContext, TrackId, UserId};
//! use cadence_playback::{PlaybackConfig, PlaybackController, StartPlayback};
//! # async fn example<S: cadence_core::PlaybackStore>(store: S) -> cadence_core::Result<()> {
//! let controller = PlaybackController::new(store, PlaybackConfig::default());
//! let user = UserId::new("listener-1");
//!
//! let request = StartPlayback::track(TrackId::new("track-1"))
//!     .with_context(PlaybackContext::album("album-1"));
//! controller.start(&user, request).await?;
//!
//! controller.set_volume(&user, 65).await?;
//! let now_playing = controller.next(&user).await?;
//! println!("{}", now_playing.session.track_id);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod history;
pub mod locks;
pub mod navigator;
pub mod queue;

pub use config::{PlayCountPolicy, PlaybackConfig};
pub use controller::{clamp_position, clamp_volume, PlaybackController, StartPlayback};
pub use history::PlayHistoryRecorder;
pub use locks::UserLocks;
pub use navigator::ContextNavigator;
pub use queue::ManualQueue;
