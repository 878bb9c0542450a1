//! onair-sv (Schedule Viewer) - broadcast schedule and live program service
//!
//! Serves the home banner, live-TV page and schedule page data for the
//! station site, resolved in the station's broadcast timezone.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use onair_common::backend::{RestScheduleBackend, ScheduleBackend, StaticBackend};
use onair_common::config::TomlConfig;
use onair_sv::{build_router, AppState};

/// Command-line arguments for onair-sv
#[derive(Parser, Debug)]
#[command(name = "onair-sv")]
#[command(about = "Broadcast schedule viewer service for onair")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "ONAIR_SV_PORT")]
    port: Option<u16>,

    /// Path to TOML config file
    #[arg(short, long, env = "ONAIR_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the backend data service
    #[arg(long)]
    backend_url: Option<String>,

    /// Broadcast timezone (IANA name)
    #[arg(long)]
    timezone: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    config.apply_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(url) = args.backend_url {
        config.backend.url = Some(url);
    }
    if let Some(tz) = args.timezone {
        config.timezone = tz;
    }

    let level = &config.logging.level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("onair_sv={level},onair_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting onair Schedule Viewer (onair-sv) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    config.validate().context("Invalid configuration")?;

    let clock = config.broadcast_clock()?;
    info!("Broadcast timezone: {}", config.timezone);

    let backend: Arc<dyn ScheduleBackend> = if config.backend.url.is_some() {
        let backend = RestScheduleBackend::new(&config.backend)
            .context("Failed to create backend client")?;
        info!("Schedule backend: {}", backend.rows_url());
        Arc::new(backend)
    } else {
        warn!("No backend url configured, serving the bundled default week");
        Arc::new(StaticBackend::empty())
    };

    let state = AppState::new(backend, Arc::new(clock), config.tick_interval());
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("onair-sv listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
