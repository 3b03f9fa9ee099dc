//! Local Library Server - lending library catalog
//!
//! REST API server over a PostgreSQL or in-memory catalog store.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use locallibrary_server::{
    api,
    config::{AppConfig, StorageBackend},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("locallibrary_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Local Library Server v{}", env!("CARGO_PKG_VERSION"));

    let query_timeout = config.database.query_timeout();
    let repository = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .connect(&config.database.url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!("Database migrations completed");
            Repository::postgres(pool, query_timeout)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Repository::in_memory(query_timeout)
        }
    };

    let services = Services::new(repository, config.auth.clone());

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
