//! User statistics server
//!
//! Registers users and counts their daily actions over a REST JSON API.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::{future::IntoFuture, net::SocketAddr, path::Path, sync::Arc};
use tokio::sync::watch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use userstats_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs get flushed on exit
    let _log_guard = init_tracing(&config.logging)?;

    tracing::info!("Starting userstats server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let connect_options = config
        .database
        .connect_options()
        .context("Invalid database configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_with(connect_options)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Arc::new(Services::new(
        Arc::new(repository),
        config.database.query_timeout(),
    ));

    let state = AppState {
        services: services.clone(),
    };

    // Build router
    let app = api::create_router(state);

    // Start server
    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("Invalid host address")?,
        config.server.port,
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            })
            .into_future(),
    );

    tokio::select! {
        result = &mut server => {
            // The listener stopped without being asked to
            services.shutdown().await;
            result.context("Server task failed")??;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    let drain = config.shutdown.drain_timeout();
    tracing::info!("Shutdown signal received, draining requests for up to {:?}", drain);
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(drain, &mut server).await {
        Ok(Ok(Ok(()))) => tracing::info!("All in-flight requests completed"),
        Ok(Ok(Err(e))) => tracing::error!("Server error during shutdown: {}", e),
        Ok(Err(e)) => tracing::error!("Server task failed during shutdown: {}", e),
        Err(_) => {
            tracing::warn!("Drain period elapsed, dropping remaining requests");
            server.abort();
        }
    }

    services.shutdown().await;
    tracing::info!("Database connections closed");

    Ok(())
}

/// Initialize tracing: stdout in the configured format, plus an optional log file
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("userstats_server={},tower_http=debug", config.level).into());

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(match config.format.as_str() {
        "json" => fmt::layer().json().boxed(),
        _ => fmt::layer().boxed(),
    });

    let guard = match config.file_path() {
        Some(file) => {
            let path = Path::new(file);
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", file))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .init();

    Ok(guard)
}

/// Resolves on SIGINT, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
