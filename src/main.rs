//! Vergo Server: multi-tenant identity, session and tenancy service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use vergo_api::app::{build_app, serve_with_grace, shutdown_signal};
use vergo_api::state::{AppState, Backends};
use vergo_core::config::AppConfig;
use vergo_core::error::AppError;
use vergo_core::traits::{Clock, SystemClock};
use vergo_database::DatabasePool;

#[tokio::main]
async fn main() {
    let env = std::env::var("VERGO_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Vergo v{}", env!("CARGO_PKG_VERSION"));

    // Step 1: Database connection + migrations
    let db = DatabasePool::connect(&config.database).await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations...");
        vergo_database::migration::run_migrations(db.pool()).await?;
        tracing::info!("Database migrations complete");
    }

    // Step 2: Auth components over PostgreSQL backends
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let backends = Backends::postgres(&db, Arc::clone(&clock));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(config, Some(db.clone()), backends, clock)?;
    let app = build_app(state);

    // Step 3: Bind and serve
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Vergo server listening on {}", addr);

    // Step 4: Serve until the signal, then drain for at most the grace period
    serve_with_grace(listener, app, shutdown_signal(), grace).await?;

    // Step 5: Release the pool
    if tokio::time::timeout(grace, db.close()).await.is_err() {
        tracing::warn!(
            grace_seconds = grace.as_secs(),
            "Database pool did not close within the grace period"
        );
    }

    tracing::info!("Vergo server shut down gracefully");
    Ok(())
}
