//! # HTTP Check Server
//!
//! Runs the check definition API inside the cluster.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_DSN=postgres://checks:checks@db/checks cargo run --bin httpcheck-server
//!
//! HTTPCHECK_ENV=production HTTPCHECK_BIND_ADDRESS=0.0.0.0:9090 cargo run --bin httpcheck-server
//! ```

use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use httpcheck::config::ServiceConfig;
use httpcheck::database::{DatabaseConnection, PgHttpCheckRepository};
use httpcheck::instrumentation::InstrumentedRepository;
use httpcheck::logging;
use httpcheck::resources::KubeResourceClient;
use httpcheck::service::HttpCheckService;
use httpcheck::web::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_structured_logging();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        build = if cfg!(debug_assertions) { "debug" } else { "release" },
        "Starting HTTP check server"
    );

    let config = ServiceConfig::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let db = match DatabaseConnection::connect_with_retry(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Giving up on the database");
            return Err(e).context("database unavailable at startup");
        }
    };
    db.migrate().await.context("failed to migrate database schema")?;

    let resources = KubeResourceClient::in_cluster(config.resource.clone())
        .context("failed to build in-cluster orchestration API client")?;
    let repository = InstrumentedRepository::new(PgHttpCheckRepository::new(db.pool().clone()));
    let service = HttpCheckService::new(Arc::new(repository), Arc::new(resources));

    let app = create_app(AppState::new(service, config.request_timeout()));

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;

    info!(
        bind_address = %config.bind_address,
        namespace = %config.resource.namespace,
        request_timeout_ms = config.request_timeout_ms,
        "HTTP check server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    db.close().await;
    info!("HTTP check server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
