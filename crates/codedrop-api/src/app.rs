//! Application builder: wires collaborators, services, router, and the
//! background scheduler into a running server.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;

use codedrop_core::config::AppConfig;
use codedrop_core::error::AppError;
use codedrop_core::result::AppResult;
use codedrop_database::migration::run_migrations;
use codedrop_database::{
    DatabasePool, MemoryShareRecordStore, ShareRecordRepository, ShareRecordStore,
};
use codedrop_storage::StorageManager;
use codedrop_worker::{CronScheduler, PurgeJobHandler};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Connects the configured record store and storage provider and wires
/// the services around them.
///
/// Returns the database pool as well (absent for the memory backend) so
/// the caller can close it on shutdown.
pub async fn build_state(config: AppConfig) -> AppResult<(AppState, Option<DatabasePool>)> {
    let (record_store, pool): (Arc<dyn ShareRecordStore>, Option<DatabasePool>) =
        if config.database.is_memory() {
            tracing::warn!("Using the in-memory record store; issued codes are lost on restart");
            (Arc::new(MemoryShareRecordStore::new()), None)
        } else {
            let pool = DatabasePool::connect(&config.database).await?;
            if config.database.auto_migrate {
                run_migrations(pool.pool()).await?;
            }
            let repo = ShareRecordRepository::new(pool.pool().clone());
            (Arc::new(repo), Some(pool))
        };

    tracing::info!(
        "Initializing storage (provider: {}, strategy: {})...",
        config.storage.default_provider,
        config.storage.upload_strategy
    );
    let storage_manager =
        StorageManager::from_config(&config.storage, &config.server.public_base_url).await?;

    let state = AppState::new(config, record_store, storage_manager)?;
    Ok((state, pool))
}

/// Runs the CodeDrop server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CodeDrop server...");

    // ── Step 1: Collaborators and services ───────────────────────
    let (state, pool) = build_state(config.clone()).await?;

    // ── Step 2: Shutdown channel & scheduler ─────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let scheduler = if config.worker.enabled {
        let handler = Arc::new(PurgeJobHandler::new((*state.purge_service).clone()));
        let scheduler = CronScheduler::new(handler).await?;
        scheduler
            .register_share_purge(&config.worker.purge_schedule)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 3: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(
        code_width = config.share.code_width,
        record_store = %config.database.backend,
        "CodeDrop server listening on {}",
        addr
    );

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    })
    .into_future();

    // In-flight requests get the grace period to finish once the signal
    // has been received.
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let forced = async move {
        if shutdown_rx.changed().await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = forced => {
            tracing::warn!(
                grace_seconds = grace.as_secs(),
                "Grace period elapsed, dropping open connections"
            );
        }
    }

    // ── Step 4: Teardown ─────────────────────────────────────────
    if let Some(scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::error!(error = %e, "Failed to stop scheduler");
        }
    }
    if let Some(pool) = pool {
        pool.close().await;
    }

    tracing::info!("CodeDrop server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
