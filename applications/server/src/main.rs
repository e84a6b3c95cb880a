/// Cadence Server - per-user playback engine over HTTP
use cadence_core::UserId;
use cadence_playback::PlaybackController;
use cadence_server::{config::ServerConfig, create_router, services::AuthService, state::AppState};
use cadence_storage::SqliteStore;
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-server")]
#[command(about = "Cadence playback session and queue server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run database migrations and exit
    Migrate {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print a signed access token for a user id
    IssueToken {
        /// Subject of the token
        #[arg(short, long)]
        user_id: String,
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence_server=info,cadence_playback=info,cadence_storage=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(load_config(config)?).await?;
        }
        Commands::Migrate { config } => {
            let config = load_config(config)?;
            connect(&config).await?;
            tracing::info!("Migrations applied");
        }
        Commands::IssueToken { user_id, config } => {
            let config = load_config(config)?;
            let auth_service = AuthService::new(
                config.auth.jwt_secret.clone(),
                config.auth.jwt_expiration_hours,
            );
            println!("{}", auth_service.create_access_token(&UserId::new(user_id))?);
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ServerConfig> {
    let config = ServerConfig::load(path.as_deref())?;
    config.validate()?;
    Ok(config)
}

/// Open the pool and bring the schema up to date
async fn connect(config: &ServerConfig) -> anyhow::Result<SqlitePool> {
    let pool = cadence_storage::create_pool_with(
        &config.storage.database_url,
        config.storage.pool_options(),
    )
    .await?;
    cadence_storage::run_migrations(&pool).await?;
    Ok(pool)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Cadence Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let pool = connect(&config).await?;
    tracing::info!("Database connected");

    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    ));

    let playback = Arc::new(PlaybackController::new(
        SqliteStore::new(pool),
        config.playback.clone(),
    ));

    let app = create_router(AppState::new(playback, auth_service));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
