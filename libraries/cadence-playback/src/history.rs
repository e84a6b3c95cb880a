//! Play history recording and play counting
//!
//! Every attempt is appended to the history. Whether it also bumps the
//! track's aggregate counter is decided in this order:
//!
//! 1. a play of the same track by the same user inside the dedup window
//!    never counts
//! 2. otherwise the listen must reach `min(max_threshold, duration * fraction)`

use crate::config::PlayCountPolicy;
use cadence_core::{
    types::{NewPlay, PlayHistoryEntry, Track, TrackId, UserId},
    CadenceError, CatalogReader, PlayHistoryStore, Result,
};
use chrono::{DateTime, Utc};

pub struct PlayHistoryRecorder<'a, S: ?Sized> {
    store: &'a S,
    policy: &'a PlayCountPolicy,
}

impl<'a, S: PlayHistoryStore + CatalogReader + ?Sized> PlayHistoryRecorder<'a, S> {
    pub fn new(store: &'a S, policy: &'a PlayCountPolicy) -> Self {
        Self { store, policy }
    }

    /// Record a play now. Returns whether it counted.
    pub async fn record_play(
        &self,
        user_id: &UserId,
        track_id: &TrackId,
        play_duration_seconds: Option<f64>,
    ) -> Result<bool> {
        self.record_play_at(user_id, track_id, play_duration_seconds, Utc::now())
            .await
    }

    /// Record a play at an explicit instant
    pub async fn record_play_at(
        &self,
        user_id: &UserId,
        track_id: &TrackId,
        play_duration_seconds: Option<f64>,
        played_at: DateTime<Utc>,
    ) -> Result<bool> {
        check_duration(play_duration_seconds)?;

        let track = self
            .store
            .get_track(track_id)
            .await?
            .ok_or_else(|| CadenceError::TrackNotFound(track_id.clone()))?;

        let play = self
            .prepare(user_id, &track, play_duration_seconds, played_at)
            .await?;
        self.store.append_play(&play).await?;

        Ok(play.counted)
    }

    /// Build the history row for a play and decide whether it counts.
    ///
    /// Reads only; the caller appends the row, alone or as part of a larger
    /// write.
    pub async fn prepare(
        &self,
        user_id: &UserId,
        track: &Track,
        play_duration_seconds: Option<f64>,
        played_at: DateTime<Utc>,
    ) -> Result<NewPlay> {
        check_duration(play_duration_seconds)?;

        // Look for an earlier play before this one is written
        let since = played_at
            .checked_sub_signed(self.policy.dedup_window()?)
            .ok_or_else(|| CadenceError::invalid_argument("played_at is out of range"))?;
        let duplicate = self.store.has_play_since(user_id, &track.id, since).await?;

        let counted = if duplicate {
            tracing::debug!(
                %user_id,
                track_id = %track.id,
                "repeat play inside dedup window, not counted"
            );
            false
        } else {
            self.policy
                .meets_threshold(track.duration_seconds, play_duration_seconds)
        };

        if counted {
            tracing::debug!(%user_id, track_id = %track.id, "play counted");
        }

        Ok(NewPlay {
            user_id: user_id.clone(),
            track_id: track.id.clone(),
            played_at,
            play_duration_seconds,
            counted,
        })
    }

    /// Newest first
    pub async fn recent(&self, user_id: &UserId, limit: i64) -> Result<Vec<PlayHistoryEntry>> {
        self.store.recent_plays(user_id, limit).await
    }
}

fn check_duration(play_duration_seconds: Option<f64>) -> Result<()> {
    match play_duration_seconds {
        Some(seconds) if !seconds.is_finite() || seconds < 0.0 => Err(
            CadenceError::invalid_argument("play_duration_seconds must be a non-negative number"),
        ),
        _ => Ok(()),
    }
}
