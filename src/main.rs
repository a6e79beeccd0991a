//! Vibes MCP Server - Binary Entry Point
//!
//! Serves MCP over Server-Sent Events. Configuration comes from
//! `vibes.toml` (or `VIBES_CONFIG`) plus `VIBES_*` environment overrides;
//! log filtering from `RUST_LOG`.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

use vibes_mcp::api::{create_router, AppState};
use vibes_mcp::config::VibesConfig;
use vibes_mcp::error::{VibeError, VibeResult};
use vibes_mcp::session::{MemoryStore, Sessions};

/// How often expired sessions are swept out of the cache
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> VibeResult<()> {
    // Initialize logging - use RUST_LOG env var or default to info
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = VibesConfig::from_env()?;

    let store = Arc::new(MemoryStore::new());
    let sessions = Sessions::new(store.clone(), config.service.session_ttl());

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = store.purge_expired();
            if purged > 0 {
                debug!(purged, "Purged expired sessions");
            }
        }
    });

    let ip: IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| VibeError::Config(format!("invalid host '{}': {}", config.server.host, e)))?;
    let addr = SocketAddr::new(ip, config.server.port);

    let state = Arc::new(AppState::with_sessions(config, sessions)?);
    info!(
        name = %state.config.service.server_name,
        version = %state.config.service.server_version,
        methods = state.methods.len(),
        tools = state.tools.len(),
        "Vibes MCP server starting"
    );

    let app = create_router(state.clone());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Open streams never end on their own
            state.shutdown();
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
