//! # Taskboard API Server
//!
//! Serves the users and tasks CRUD API.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/taskboard cargo run -p taskboard-api
//! STORAGE_BACKEND=memory cargo run -p taskboard-api
//! ```

use anyhow::Context;
use taskboard_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat, StorageBackend},
};
use taskboard_shared::{
    db::{migrations::run_migrations, pool},
    store::{memory::MemoryStore, postgres::PgStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "taskboard_api=debug,taskboard_shared=info,tower_http=debug".into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        environment = ?config.api.environment,
        backend = ?config.database.backend,
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let mut db_pool = None;
    let state = match config.database.backend {
        StorageBackend::Postgres => {
            let pool_config = config
                .database
                .pool_config()
                .context("DATABASE_URL is required for the postgres backend")?;
            let pg = pool::create_pool(pool_config)
                .await
                .context("Failed to connect to the database")?;

            if config.database.run_migrations {
                run_migrations(&pg).await.context("Failed to run migrations")?;
            }

            db_pool = Some(pg.clone());
            AppState::with_store(PgStore::new(pg), config.clone())
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            AppState::with_store(MemoryStore::new(), config.clone())
        }
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg) = db_pool {
        pool::close_pool(pg).await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
