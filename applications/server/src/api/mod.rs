/// API route modules
pub mod health;
pub mod history;
pub mod playback;
pub mod playlists;
pub mod queue;
