//! Cadence Server Library
//!
//! HTTP surface for the Cadence playback engine: bearer-token verification,
//! configuration, and one route per playback, queue and play-history
//! operation.
//!
//! This library exposes the router and its components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::auth::AuthService;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
pub fn create_router(app_state: AppState) -> Router {
    let auth_service = Arc::clone(&app_state.auth_service);

    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(api::health::health));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Playback session
        .route(
            "/playback",
            get(api::playback::get_playback).delete(api::playback::stop),
        )
        .route("/playback/play", post(api::playback::play))
        .route("/playback/resume", post(api::playback::resume))
        .route("/playback/pause", post(api::playback::pause))
        .route("/playback/seek", post(api::playback::seek))
        .route("/playback/volume", post(api::playback::set_volume))
        .route("/playback/shuffle", post(api::playback::set_shuffle))
        .route("/playback/repeat", post(api::playback::set_repeat))
        .route("/playback/next", post(api::playback::next))
        .route("/playback/previous", post(api::playback::previous))
        .route("/playback/transfer", post(api::playback::transfer))
        // Manual queue
        .route(
            "/queue",
            get(api::queue::list_queue)
                .post(api::queue::enqueue)
                .delete(api::queue::clear_queue),
        )
        .route("/queue/dequeue", post(api::queue::dequeue))
        .route("/queue/:item_id", delete(api::queue::remove_from_queue))
        // Play history
        .route("/plays", post(api::history::record_play))
        .route("/plays/recent", get(api::history::recent_plays))
        .route("/tracks/:id/play-count", get(api::history::play_count))
        // Playlist positioning
        .route(
            "/playlists/:id/tracks",
            get(api::playlists::list_tracks).post(api::playlists::add_track),
        )
        .route(
            "/playlists/:id/tracks/:track_id",
            delete(api::playlists::remove_track),
        )
        .route(
            "/playlists/:id/tracks/:track_id/position",
            put(api::playlists::reorder_track),
        )
        .layer(axum_middleware::from_fn_with_state(
            auth_service,
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
