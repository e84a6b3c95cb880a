mod catalog;
mod history;
mod ids;
mod playback;
mod queue;

pub use catalog::{
    Album, Artist, CreateAlbum, CreatePlaylist, CreateTrack, Playlist, PlaylistEntry, Track,
};
pub use history::{NewPlay, PlayHistoryEntry};
pub use ids::{AlbumId, ArtistId, PlaylistId, QueueItemId, TrackId, UserId};
pub use playback::{
    ContextType, PlaybackContext, PlaybackSession, RepeatMode, SessionAdvance, SessionView,
};
pub use queue::{QueueEntry, QueueItem};
