//! Replenishment Dashboard - Backend Server
//!
//! Stores versioned purchasing spreadsheets per company and serves runout,
//! urgency and MOQ-rounded purchase recommendations over them.

use anyhow::Context;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

use config::StorageBackend;
use external::{DatasetStore, MemoryStore, PgStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DatasetStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    // Initialize tracing
    let json_logs = config.logging.json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rpd_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting Replenishment Dashboard Server");
    tracing::info!("Environment: {}", config.environment);

    let store = create_store(&config).await?;

    // Create application state
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server.host / server.port")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the configured dataset store
async fn create_store(config: &Config) -> anyhow::Result<Arc<dyn DatasetStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory dataset store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .context("database.url is required when storage.backend = postgres")?;

            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(url)
                .await?;
            tracing::info!("Database connection established");

            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations").run(&db_pool).await?;
                tracing::info!("Migrations completed");
            }

            Ok(Arc::new(PgStore::new(db_pool)))
        }
    }
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(state.config.upload.max_bytes);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(body_limit)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Replenishment Dashboard API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
