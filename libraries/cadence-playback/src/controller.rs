//! Playback session state machine
//!
//! A user either has no session (nothing playing) or exactly one. Every
//! mutating command takes that user's lock, re-reads the session from the
//! store, applies the transition and writes it back.

use crate::config::PlaybackConfig;
use crate::history::PlayHistoryRecorder;
use crate::locks::UserLocks;
use crate::navigator::ContextNavigator;
use crate::queue::ManualQueue;
use cadence_core::{
    types::{
        PlayHistoryEntry, PlaybackContext, PlaybackSession, QueueEntry, QueueItem, QueueItemId,
        RepeatMode, SessionAdvance, SessionView, Track, TrackId, UserId,
    },
    CadenceError, PlaybackStore, Result,
};
use chrono::Utc;
use serde::Deserialize;

/// Arguments of [`PlaybackController::start`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartPlayback {
    pub track_id: TrackId,
    #[serde(default)]
    pub context: Option<PlaybackContext>,
    #[serde(default)]
    pub position_ms: Option<i64>,
    #[serde(default)]
    pub volume_percent: Option<i64>,
    #[serde(default)]
    pub device_name: Option<String>,
}

impl StartPlayback {
    pub fn track(track_id: TrackId) -> Self {
        Self {
            track_id,
            context: None,
            position_ms: None,
            volume_percent: None,
            device_name: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: PlaybackContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Clamp a position into `0..=duration`
pub fn clamp_position(position_ms: i64, duration_seconds: i64) -> i64 {
    let max = duration_seconds.max(0).saturating_mul(1000);
    position_ms.clamp(0, max)
}

/// Clamp a volume into `0..=100`
pub fn clamp_volume(volume_percent: i64) -> u8 {
    volume_percent.clamp(0, 100) as u8
}

/// Per-user playback engine over a store handle
pub struct PlaybackController<S> {
    store: S,
    config: PlaybackConfig,
    locks: UserLocks,
}

impl<S: PlaybackStore> PlaybackController<S> {
    pub fn new(store: S, config: PlaybackConfig) -> Self {
        Self {
            store,
            config,
            locks: UserLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    fn queue(&self) -> ManualQueue<'_, S> {
        ManualQueue::new(&self.store)
    }

    fn navigator(&self) -> ContextNavigator<'_, S> {
        ContextNavigator::new(&self.store)
    }

    fn recorder(&self) -> PlayHistoryRecorder<'_, S> {
        PlayHistoryRecorder::new(&self.store, &self.config.play_count)
    }

    /// The user's session with display data, `None` when nothing is playing
    pub async fn current(&self, user_id: &UserId) -> Result<Option<SessionView>> {
        match self.store.get_session(user_id).await? {
            Some(session) => Ok(Some(self.view(session).await?)),
            None => Ok(None),
        }
    }

    /// Load a track and start playing it.
    ///
    /// Creates the session on first use. Shuffle and repeat carry over from an
    /// existing session, as do volume and device unless supplied. Does not
    /// record a play.
    pub async fn start(&self, user_id: &UserId, request: StartPlayback) -> Result<SessionView> {
        let _guard = self.locks.lock(user_id).await;

        let track = self.require_track(&request.track_id).await?;
        let existing = self.store.get_session(user_id).await?;

        let volume_percent = match (request.volume_percent, &existing) {
            (Some(volume), _) => clamp_volume(volume),
            (None, Some(session)) => session.volume_percent,
            (None, None) => self.config.default_volume_percent,
        };
        let device_name = match (request.device_name, &existing) {
            (Some(device), _) => device,
            (None, Some(session)) => session.device_name.clone(),
            (None, None) => self.config.default_device_name.clone(),
        };
        let (shuffle, repeat) = existing
            .as_ref()
            .map_or((false, RepeatMode::Off), |s| (s.shuffle, s.repeat));

        let session = PlaybackSession {
            user_id: user_id.clone(),
            track_id: track.id.clone(),
            context: request.context,
            is_playing: true,
            position_ms: clamp_position(
                request.position_ms.unwrap_or(0),
                track.duration_seconds,
            ),
            volume_percent,
            shuffle,
            repeat,
            device_name,
            updated_at: Utc::now(),
        };

        self.store.save_session(&session).await?;

        tracing::debug!(%user_id, track_id = %session.track_id, "playback started");

        self.view_with_track(session, Some(track)).await
    }

    pub async fn resume(&self, user_id: &UserId) -> Result<SessionView> {
        self.update(user_id, |session, _| {
            session.is_playing = true;
            Ok(())
        })
        .await
    }

    pub async fn pause(&self, user_id: &UserId) -> Result<SessionView> {
        self.update(user_id, |session, _| {
            session.is_playing = false;
            Ok(())
        })
        .await
    }

    /// Move the position, clamped to the current track's duration
    pub async fn seek(&self, user_id: &UserId, position_ms: i64) -> Result<SessionView> {
        self.update(user_id, |session, track| {
            let duration_seconds = track.map_or(0, |t| t.duration_seconds);
            session.position_ms = clamp_position(position_ms, duration_seconds);
            Ok(())
        })
        .await
    }

    /// Set the volume, clamped to `0..=100`
    pub async fn set_volume(&self, user_id: &UserId, volume_percent: i64) -> Result<SessionView> {
        self.update(user_id, |session, _| {
            session.volume_percent = clamp_volume(volume_percent);
            Ok(())
        })
        .await
    }

    pub async fn set_shuffle(&self, user_id: &UserId, shuffle: bool) -> Result<SessionView> {
        self.update(user_id, |session, _| {
            session.shuffle = shuffle;
            Ok(())
        })
        .await
    }

    pub async fn set_repeat(&self, user_id: &UserId, repeat: RepeatMode) -> Result<SessionView> {
        self.update(user_id, |session, _| {
            session.repeat = repeat;
            Ok(())
        })
        .await
    }

    pub async fn transfer_device(
        &self,
        user_id: &UserId,
        device_name: String,
    ) -> Result<SessionView> {
        if device_name.trim().is_empty() {
            return Err(CadenceError::invalid_argument("device_name must not be empty"));
        }

        self.update(user_id, move |session, _| {
            session.device_name = device_name;
            Ok(())
        })
        .await
    }

    /// Advance to the next track.
    ///
    /// Resolution order: repeat-track replays the current track, then the
    /// manual queue head is consumed, then the context is navigated. The
    /// queue head is only removed together with the session write, so a
    /// failed `next` leaves the queue as it was.
    pub async fn next(&self, user_id: &UserId) -> Result<SessionView> {
        let _guard = self.locks.lock(user_id).await;
        let session = self.require_session(user_id).await?;

        let (candidate, consumed) = if session.repeat == RepeatMode::Track {
            (Some(session.track_id.clone()), None)
        } else if let Some(item) = self.queue().peek_head(user_id).await? {
            (Some(item.track_id), Some(item.id))
        } else if let Some(context) = &session.context {
            let next = self
                .navigator()
                .next(
                    context,
                    &session.track_id,
                    session.shuffle,
                    session.repeat == RepeatMode::Context,
                )
                .await?;
            (next, None)
        } else {
            (None, None)
        };

        let track_id = candidate.ok_or(CadenceError::NoNextTrack)?;
        self.advance_to(session, track_id, consumed).await
    }

    /// Step back within the context.
    ///
    /// Never consults the manual queue and has no shuffle or repeat-track
    /// handling.
    pub async fn previous(&self, user_id: &UserId) -> Result<SessionView> {
        let _guard = self.locks.lock(user_id).await;
        let session = self.require_session(user_id).await?;

        let candidate = match &session.context {
            Some(context) => self.navigator().previous(context, &session.track_id).await?,
            None => None,
        };

        let track_id = candidate.ok_or(CadenceError::NoPreviousTrack)?;
        self.advance_to(session, track_id, None).await
    }

    /// Delete the session
    pub async fn stop(&self, user_id: &UserId) -> Result<()> {
        let _guard = self.locks.lock(user_id).await;

        if !self.store.delete_session(user_id).await? {
            return Err(CadenceError::NoActivePlayback);
        }

        tracing::debug!(%user_id, "playback stopped");
        Ok(())
    }

    pub async fn enqueue(
        &self,
        user_id: &UserId,
        track_id: &TrackId,
        context: Option<&PlaybackContext>,
    ) -> Result<QueueItem> {
        let _guard = self.locks.lock(user_id).await;
        self.queue().enqueue(user_id, track_id, context).await
    }

    /// Consume the queue head without changing the session
    pub async fn dequeue(&self, user_id: &UserId) -> Result<Option<QueueItem>> {
        let _guard = self.locks.lock(user_id).await;
        self.queue().dequeue_head(user_id).await
    }

    pub async fn remove_from_queue(&self, user_id: &UserId, item_id: QueueItemId) -> Result<()> {
        let _guard = self.locks.lock(user_id).await;
        self.queue().remove(user_id, item_id).await
    }

    pub async fn clear_queue(&self, user_id: &UserId) -> Result<u64> {
        let _guard = self.locks.lock(user_id).await;
        self.queue().clear(user_id).await
    }

    /// Queue by position; `limit` defaults and is capped per configuration
    pub async fn list_queue(
        &self,
        user_id: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<QueueEntry>> {
        let limit = self.config.list_limit(limit);
        self.queue().list(user_id, limit).await
    }

    /// Record an explicit play. Returns whether it counted.
    pub async fn record_play(
        &self,
        user_id: &UserId,
        track_id: &TrackId,
        play_duration_seconds: Option<f64>,
    ) -> Result<bool> {
        let _guard = self.locks.lock(user_id).await;
        self.recorder()
            .record_play(user_id, track_id, play_duration_seconds)
            .await
    }

    pub async fn recent_plays(
        &self,
        user_id: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<PlayHistoryEntry>> {
        let limit = self.config.list_limit(limit);
        self.recorder().recent(user_id, limit).await
    }

    /// Aggregate counter of a track
    pub async fn play_count(&self, track_id: &TrackId) -> Result<i64> {
        Ok(self.require_track(track_id).await?.play_count)
    }

    /// Load `track_id` into the session and log the implied listen.
    ///
    /// The session write, the queue item removal and the history row are
    /// committed together or not at all.
    async fn advance_to(
        &self,
        mut session: PlaybackSession,
        track_id: TrackId,
        consumed_queue_item: Option<QueueItemId>,
    ) -> Result<SessionView> {
        let track = self.require_track(&track_id).await?;

        session.load_track(track_id);
        session.touch();

        let play = self
            .recorder()
            .prepare(
                &session.user_id,
                &track,
                Some(self.config.skip_listen_seconds),
                session.updated_at,
            )
            .await?;

        self.store
            .commit_advance(&SessionAdvance {
                session: session.clone(),
                consumed_queue_item,
                play,
            })
            .await?;

        tracing::debug!(
            user_id = %session.user_id,
            track_id = %session.track_id,
            from_queue = consumed_queue_item.is_some(),
            "advanced"
        );

        self.view_with_track(session, Some(track)).await
    }

    /// Apply a flag transition to an existing session
    async fn update<F>(&self, user_id: &UserId, apply: F) -> Result<SessionView>
    where
        F: FnOnce(&mut PlaybackSession, Option<&Track>) -> Result<()> + Send,
    {
        let _guard = self.locks.lock(user_id).await;

        let mut session = self.require_session(user_id).await?;
        let track = self.store.get_track(&session.track_id).await?;

        apply(&mut session, track.as_ref())?;
        session.touch();
        self.store.save_session(&session).await?;

        self.view_with_track(session, track).await
    }

    async fn require_session(&self, user_id: &UserId) -> Result<PlaybackSession> {
        self.store
            .get_session(user_id)
            .await?
            .ok_or(CadenceError::NoActivePlayback)
    }

    async fn require_track(&self, track_id: &TrackId) -> Result<Track> {
        self.store
            .get_track(track_id)
            .await?
            .ok_or_else(|| CadenceError::TrackNotFound(track_id.clone()))
    }

    async fn view(&self, session: PlaybackSession) -> Result<SessionView> {
        let track = self.store.get_track(&session.track_id).await?;
        self.view_with_track(session, track).await
    }

    async fn view_with_track(
        &self,
        session: PlaybackSession,
        track: Option<Track>,
    ) -> Result<SessionView> {
        let context_name = match &session.context {
            Some(context) => self.store.get_context_name(context).await?,
            None => None,
        };

        Ok(SessionView {
            session,
            track,
            context_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_clamps_to_track_bounds() {
        assert_eq!(clamp_position(-5, 200), 0);
        assert_eq!(clamp_position(15_000, 200), 15_000);
        assert_eq!(clamp_position(500_000, 200), 200_000);
        assert_eq!(clamp_position(10, 0), 0);
        assert_eq!(clamp_position(10, -3), 0);
    }

    #[test]
    fn volume_clamps_to_percent_range() {
        assert_eq!(clamp_volume(-1), 0);
        assert_eq!(clamp_volume(55), 55);
        assert_eq!(clamp_volume(101), 100);
        assert_eq!(clamp_volume(i64::MAX), 100);
    }

    #[test]
    fn start_request_deserializes_with_optional_fields() {
        let request: StartPlayback = serde_json::from_str(
            r#"{"track_id": "t-1", "context": {"type": "album", "id": "al-1"}}"#,
        )
        .unwrap();

        assert_eq!(
            request,
            StartPlayback::track(TrackId::new("t-1")).with_context(PlaybackContext::album("al-1"))
        );
    }
}
