/// Server configuration
use crate::error::{Result, ServerError};
use cadence_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,
}

impl StorageSettings {
    pub fn pool_options(&self) -> cadence_storage::PoolOptions {
        cadence_storage::PoolOptions {
            max_connections: self.max_connections,
            busy_timeout: Duration::from_secs(self.busy_timeout_secs),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment.
    ///
    /// Reads `path` when given, otherwise `config.toml` if it exists, then
    /// overlays `CADENCE_`-prefixed variables (`CADENCE_AUTH__JWT_SECRET`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set CADENCE_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ServerError::Config("server.port must not be 0".to_string()));
        }

        if self.storage.max_connections == 0 {
            return Err(ServerError::Config(
                "storage.max_connections must be at least 1".to_string(),
            ));
        }

        self.playback
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        max_connections: default_max_connections(),
        busy_timeout_secs: default_busy_timeout_secs(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/cadence.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_secs() -> u64 {
    30
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_values_and_defaults() {
        let file = write_config(
            r#"
            [server]
            port = 9090

            [auth]
            jwt_secret = "s3cret"

            [playback]
            skip_listen_seconds = 12.0

            [playback.play_count]
            dedup_window_secs = 60
            "#,
        );

        let config = ServerConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.database_url, "sqlite://./data/cadence.db");
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.jwt_expiration_hours, 24);
        assert_eq!(config.playback.skip_listen_seconds, 12.0);
        assert_eq!(config.playback.play_count.dedup_window_secs, 60);
        assert_eq!(config.playback.default_volume_percent, 80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_secret_fails_validation() {
        let file = write_config("[server]\nport = 8081\n");
        let config = ServerConfig::load(Some(file.path())).unwrap();

        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_invalid_playback_section_fails_validation() {
        let file = write_config(
            r#"
            [auth]
            jwt_secret = "s3cret"

            [playback.play_count]
            duration_fraction = 2.0
            "#,
        );
        let config = ServerConfig::load(Some(file.path())).unwrap();

        assert!(config.validate().is_err());
    }
}
