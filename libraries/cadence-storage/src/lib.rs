//! Cadence Storage
//!
//! Multi-user `SQLite` database layer for the Cadence playback engine.
//!
//! This crate persists playback sessions, manual queues, and play history,
//! and serves the read-only catalog lookups the engine navigates with.
//!
//! # Architecture
//!
//! - **Multi-User**: every session, queue item, and history row is keyed by user
//! - **Vertical Slicing**: each feature owns its own queries and logic
//! - **Dense Positions**: queue and playlist positions are renumbered inside a
//!   single transaction whenever rows move, so `1..=n` always holds
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::{create_pool, run_migrations, SqliteStore};
//! use cadence_core::{SessionStore, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteStore::new(pool);
//! let session = store.get_session(&UserId::new("listener-1")).await?;
//! # Ok(())
//! # }
//! ```

mod columns;
mod context;
mod error;

// Catalog slices
pub mod albums;
pub mod artists;
pub mod playlists;
pub mod tracks;

// Playback state
pub mod play_history;
pub mod queue;
pub mod sessions;

pub use context::SqliteStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))
}

/// Pool tuning knobs
#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout: Duration::from_secs(30),
        }
    }
}

/// Create a new `SQLite` pool with default options
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://cadence.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    create_pool_with(database_url, PoolOptions::default()).await
}

/// Create a new `SQLite` pool
///
/// # Errors
///
/// Returns an error if the URL is malformed or the connection fails
pub async fn create_pool_with(
    database_url: &str,
    options: PoolOptions,
) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "creating sqlite pool");

    let connect = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(options.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .connect_with(connect)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::info!(max_connections = options.max_connections, "sqlite pool ready");

    Ok(pool)
}

/// Round-trip a trivial query through the pool
pub async fn ping(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
