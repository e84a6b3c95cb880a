//! Context navigation
//!
//! Resolves a context to its ordered track list and picks the neighbour of
//! the current track. The list is re-read from the catalog on every call.
//!
//! - Album contexts follow track number, playlist contexts follow position.
//! - Artist and search contexts have no ordering source and never yield a
//!   candidate.
//! - Shuffle applies to `next` only: one uniform draw from the list minus the
//!   current track. Context repeat is ignored while shuffling.

use cadence_core::{
    types::{AlbumId, ContextType, PlaybackContext, PlaylistId, TrackId},
    CatalogReader, Result,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Sequential successor of `current`.
///
/// Wraps to the first track when `repeat_context` is set. Returns `None` when
/// `current` is not part of the list.
pub fn next_in(tracks: &[TrackId], current: &TrackId, repeat_context: bool) -> Option<TrackId> {
    let index = tracks.iter().position(|t| t == current)?;

    match tracks.get(index + 1) {
        Some(next) => Some(next.clone()),
        None if repeat_context => tracks.first().cloned(),
        None => None,
    }
}

/// Sequential predecessor of `current`. Never wraps.
pub fn previous_in(tracks: &[TrackId], current: &TrackId) -> Option<TrackId> {
    let index = tracks.iter().position(|t| t == current)?;
    index.checked_sub(1).and_then(|i| tracks.get(i)).cloned()
}

/// Uniform draw from `tracks` excluding `current`
pub fn shuffle_pick<R: Rng + ?Sized>(
    tracks: &[TrackId],
    current: &TrackId,
    rng: &mut R,
) -> Option<TrackId> {
    let candidates: Vec<&TrackId> = tracks.iter().filter(|t| *t != current).collect();
    candidates.choose(rng).map(|t| (*t).clone())
}

/// Navigator bound to a catalog
pub struct ContextNavigator<'a, C: ?Sized> {
    catalog: &'a C,
}

impl<'a, C: CatalogReader + ?Sized> ContextNavigator<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Ordered track list of a context; empty for unsupported context types
    pub async fn ordered_tracks(&self, context: &PlaybackContext) -> Result<Vec<TrackId>> {
        match context.context_type {
            ContextType::Album => {
                self.catalog
                    .get_ordered_album_tracks(&AlbumId::new(context.id.as_str()))
                    .await
            }
            ContextType::Playlist => {
                let entries = self
                    .catalog
                    .get_ordered_playlist_tracks(&PlaylistId::new(context.id.as_str()))
                    .await?;
                Ok(entries.into_iter().map(|e| e.track_id).collect())
            }
            ContextType::Artist | ContextType::Search => Ok(Vec::new()),
        }
    }

    /// Next track in `context` after `current`
    pub async fn next(
        &self,
        context: &PlaybackContext,
        current: &TrackId,
        shuffle: bool,
        repeat_context: bool,
    ) -> Result<Option<TrackId>> {
        let tracks = self.ordered_tracks(context).await?;

        let candidate = if shuffle {
            shuffle_pick(&tracks, current, &mut rand::thread_rng())
        } else {
            next_in(&tracks, current, repeat_context)
        };

        tracing::debug!(
            context_type = context.context_type.as_str(),
            context_id = %context.id,
            shuffle,
            repeat_context,
            found = candidate.is_some(),
            "resolved next context track"
        );

        Ok(candidate)
    }

    /// Previous track in `context` before `current`
    pub async fn previous(
        &self,
        context: &PlaybackContext,
        current: &TrackId,
    ) -> Result<Option<TrackId>> {
        let tracks = self.ordered_tracks(context).await?;
        Ok(previous_in(&tracks, current))
    }
}
