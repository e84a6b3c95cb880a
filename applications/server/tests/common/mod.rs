//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use cadence_core::types::*;
use cadence_playback::{PlaybackConfig, PlaybackController};
use cadence_server::{create_router, AppState, AuthService};
use cadence_storage::SqliteStore;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";

/// Router over a fresh SQLite file plus handles for seeding data
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = cadence_storage::create_pool(&db_url).await.unwrap();
        cadence_storage::run_migrations(&pool).await.unwrap();

        let auth_service = Arc::new(AuthService::new(TEST_SECRET.to_string(), 1));
        let playback = Arc::new(PlaybackController::new(
            SqliteStore::new(pool.clone()),
            PlaybackConfig::default(),
        ));

        let router = create_router(AppState::new(playback, Arc::clone(&auth_service)));

        Self {
            router,
            pool,
            auth_service,
            _temp_dir: temp_dir,
        }
    }

    pub fn token_for(&self, user: &str) -> String {
        self.auth_service
            .create_access_token(&UserId::new(user))
            .unwrap()
    }

    /// Send a request as `user` and decode the JSON body (Null when empty)
    pub async fn send(
        &self,
        user: Option<&str>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user) = user {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token_for(user)),
            );
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    /// Seed an album with `count` tracks of `duration_seconds`
    pub async fn seed_album(
        &self,
        title: &str,
        count: i64,
        duration_seconds: i64,
    ) -> (Album, Vec<Track>) {
        let album = cadence_storage::albums::create(
            &self.pool,
            CreateAlbum {
                title: title.to_string(),
                artist_id: None,
            },
        )
        .await
        .unwrap();

        let mut tracks = Vec::new();
        for n in 1..=count {
            tracks.push(
                cadence_storage::tracks::create(
                    &self.pool,
                    CreateTrack {
                        title: format!("{title} {n}"),
                        artist_id: None,
                        album_id: Some(album.id.clone()),
                        track_number: Some(n),
                        duration_seconds,
                    },
                )
                .await
                .unwrap(),
            );
        }

        (album, tracks)
    }

    pub async fn seed_playlist(&self, name: &str, owner: &str) -> Playlist {
        cadence_storage::playlists::create(
            &self.pool,
            CreatePlaylist {
                name: name.to_string(),
                owner_id: UserId::new(owner),
            },
        )
        .await
        .unwrap()
    }
}
