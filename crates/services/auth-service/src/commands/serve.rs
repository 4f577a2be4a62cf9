//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use tokio::signal;
use tokio::time::Duration;

use common::{AppError, AppResult};

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::AuthServiceConfig;
use crate::infra::Database;
use crate::repository::AccountStore;
use crate::session::RedisSessionStore;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: AuthServiceConfig) -> AppResult<()> {
    config
        .validate()
        .map_err(|e| AppError::internal(format!("Invalid configuration: {}", e)))?;

    tracing::info!(
        service = %config.service.service_name,
        environment = ?config.environment,
        "Starting server..."
    );

    let db = Database::connect(&config.database)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    tracing::info!("Database connected");

    let accounts = Arc::new(AccountStore::new(
        db.get_connection(),
        Duration::from_millis(config.database.timeout_ms),
    ));
    let sessions = Arc::new(RedisSessionStore::connect(&config.cache).await?);

    let state = AppState::new(accounts, sessions, &config.jwt);
    let app = create_router(state, &config.service.cors_allowed_origins);

    let host = args.host.unwrap_or(config.service.host);
    let port = args.port.unwrap_or(config.service.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
