use anyhow::{Context, Result};
use tracing::info;

use domain::Repositories;
use persistence::MemoryStore;
use presensi_api::app::{create_app, AppState};
use presensi_api::config::{Config, StorageBackend};
use presensi_api::middleware::{init_metrics, logging::init_logging};
use presensi_api::services::bootstrap_lecturer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_logging(&config.logging).context("failed to initialize logging")?;
    init_metrics().context("failed to install Prometheus recorder")?;

    info!("Starting Presensi API v{}", env!("CARGO_PKG_VERSION"));

    let (repos, pool): (Repositories, _) = match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config: persistence::db::DatabaseConfig = (&config.database).into();
            let pool = persistence::db::create_pool(&db_config).await?;

            info!("Running database migrations...");
            persistence::db::run_migrations(&pool).await?;
            info!("Migrations completed");

            (persistence::postgres_repositories(pool.clone()), Some(pool))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            (MemoryStore::new().repositories(), None)
        }
    };

    bootstrap_lecturer(repos.lecturers.as_ref(), &config.bootstrap).await?;

    let addr = config.socket_addr()?;
    let state = AppState::new(config, repos, pool)?;
    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
