//! Dash Cache - In-process cache for the AI monitoring dashboard
//!
//! Serves cached dashboard data and cache administration over HTTP.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dash_cache::api::{create_router, AppState};
use dash_cache::{spawn_cleanup_task, spawn_warmup_task, Config};

/// Main entry point for the dashboard cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache manager (connecting the remote mirror if configured)
/// 4. Start the TTL cleanup and dashboard warm-up tasks
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dash_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dashboard cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_size={}, default_ttl={}s, remote={}, port={}, cleanup_interval={}s, warmup_interval={}s",
        config.max_size,
        config.default_ttl,
        config.redis_url.is_some(),
        config.server_port,
        config.cleanup_interval,
        config.warmup_interval
    );

    // Connecting to the mirror may block for the configured timeout.
    let state = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || AppState::from_config(&config))
            .await
            .context("failed to build cache state")?
    };

    let mut background = vec![spawn_cleanup_task(state.cache.clone(), config.cleanup_interval)];
    if config.warmup_interval > 0 {
        background.push(spawn_warmup_task(
            state.dashboard.clone(),
            config.warmup_interval,
            "24h".to_string(),
            1,
        ));
    }
    info!("Background tasks started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(background))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts background tasks.
async fn shutdown_signal(background: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
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

    for handle in background {
        handle.abort();
    }
    warn!("Background tasks aborted");
}
