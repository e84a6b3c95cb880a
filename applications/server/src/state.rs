/// Shared application state
use crate::services::AuthService;
use cadence_playback::PlaybackController;
use cadence_storage::SqliteStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub playback: Arc<PlaybackController<SqliteStore>>,
    pub store: SqliteStore,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        playback: Arc<PlaybackController<SqliteStore>>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        let store = playback.store().clone();
        Self {
            playback,
            store,
            auth_service,
        }
    }
}
