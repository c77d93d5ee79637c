//! Stat Cache - A read-through attribute cache server
//!
//! Serves file attributes over HTTP, caching lookups for configured prefixes.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stat_cache::api::{create_router, AppState};
use stat_cache::backing::FileAttributes;
use stat_cache::{CacheRuntime, Config};

/// Main entry point for the attribute cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Start the cache engine and its eviction sweeper
/// 4. Create Axum router with all endpoints
/// 5. Serve until SIGINT/SIGTERM
/// 6. Stop routing requests, then shut the cache down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stat_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Stat Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: ttl={}ms, sweep_interval={}ms, max_path_len={}, prefixes={:?}, port={}",
        config.ttl_ms,
        config.sweep_interval_ms,
        config.max_path_len,
        config.cached_prefixes,
        config.server_port
    );

    let runtime: CacheRuntime<FileAttributes> =
        CacheRuntime::start(&config).context("failed to start attribute cache")?;

    let app = create_router(AppState::new(runtime.cache()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // No request can reach the cache past this point
    runtime.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
