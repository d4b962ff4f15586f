//! Map editor backend binary.
//!
//! # Configuration
//!
//! Read from the environment (and a `.env` file, if present); see
//! [`ServerConfig::from_env`].
//!
//! ```bash
//! MAP_STORE_URI=file:///var/lib/maps BIND_ADDR=0.0.0.0:8000 cargo run -p map-server
//! ```

use anyhow::{Context, Result};
use map_server::{AppState, ServerConfig, build_router, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting map server");
    if config.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set, using the development default");
    }

    // 1. Store client, owned here and closed on shutdown
    let location = config.store_location()?;
    let store = location
        .open(&config.database)
        .with_context(|| format!("failed to open document store {location}"))?;
    tracing::info!(
        "Store: {} (db '{}', collection '{}')",
        location,
        config.database,
        config.collection
    );

    // 2. HTTP surface
    let state = AppState::new(store.clone(), config.collection.as_str(), config.store_timeout);
    let app = build_router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 3. Release the store
    tokio::task::spawn_blocking(move || store.close()).await??;
    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
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
                tracing::error!("Failed to listen for SIGTERM: {}", err);
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
