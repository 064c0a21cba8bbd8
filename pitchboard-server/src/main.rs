//! Pitchboard Server
//!
//! Event-scoped storage, scoring and leaderboards for pitch competitions.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::runtime::{StoreBackend, StoreSettings};
use config::{ConfigLoader, get_database_url};
use pitchboard_core::Keyspace;
use pitchboard_core::processors::ExpirySweeper;
use pitchboard_core::store::{KeyValueStore, MemoryStore, PgKeyValueStore};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Pitchboard - pitch competition scoring backend
#[derive(Parser, Debug)]
#[command(name = "pitchboard-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./pitchboard.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting pitchboard-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let (store, db_pool) = connect_store(&loaded_config.store, args.migrate).await?;

    // Create application state
    let keyspace = Keyspace::new(store.clone(), loaded_config.ttl);
    let state = AppState::new(keyspace, loaded_config.auth);

    // Spawn the expiry sweeper
    let (sweeper_shutdown_tx, sweeper_shutdown_rx) = watch::channel(false);
    let sweeper = ExpirySweeper::new(store, loaded_config.store.sweep_interval);
    let sweeper_handle = tokio::spawn(sweeper.run(sweeper_shutdown_rx));

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal background tasks to stop
    shutdown_notify.notify_one();
    let _ = sweeper_shutdown_tx.send(true);
    if let Err(e) = sweeper_handle.await {
        tracing::error!("Expiry sweeper task failed: {}", e);
    }

    if let Some(pool) = db_pool {
        // Close database connections gracefully
        tracing::info!("Closing database connections...");
        pool.close().await;
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Build the configured key-value backend. The pool is returned so it can
/// be closed on shutdown.
async fn connect_store(
    settings: &StoreSettings,
    migrate: bool,
) -> anyhow::Result<(Arc<dyn KeyValueStore>, Option<PgPool>)> {
    match settings.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, data will not survive a restart");
            Ok((Arc::new(MemoryStore::new()), None))
        }
        StoreBackend::Postgres => {
            // Get database URL from environment
            let database_url = get_database_url().map_err(|e| {
                tracing::error!("DATABASE_URL environment variable not set");
                e
            })?;

            // Create database connection pool
            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.operation_timeout)
                .connect(&database_url)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to database: {}", e);
                    e
                })?;
            tracing::info!("Database connection established");

            // Run migrations if requested
            if migrate {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("../migrations")
                    .run(&db_pool)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to run migrations: {}", e);
                        e
                    })?;
                tracing::info!("Migrations completed successfully");
            }

            let store = PgKeyValueStore::new(db_pool.clone(), settings.operation_timeout);
            Ok((Arc::new(store), Some(db_pool)))
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
