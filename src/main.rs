//! Health gateway (v1)
//!
//! Probes downstream services on demand and reports their liveness.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                HEALTH GATEWAY                 │
//!                        │                                               │
//!   GET /health/services │  ┌─────────┐    ┌──────────┐    ┌──────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│ handlers │───▶│  health  │──┼──▶ users:4001/health
//!                        │  │ server  │    │ join_all │    │  probe   │──┼──▶ documents:4002/health
//!                        │  └─────────┘    └──────────┘    └──────────┘──┼──▶ ...
//!   200 / 503 + JSON     │                                               │
//!   ◀────────────────────┼───────────────────────────────────────────── │
//!                        │  ┌─────────┐ ┌──────────────┐ ┌───────────┐   │
//!                        │  │ config  │ │observability │ │ lifecycle │   │
//!                        │  │+watcher │ │ logs+metrics │ │ shutdown  │   │
//!                        │  └─────────┘ └──────────────┘ └───────────┘   │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use health_gateway::config::{load_config, watcher::ConfigWatcher, GatewayConfig};
use health_gateway::observability::{logging, metrics};
use health_gateway::{GatewayServer, Shutdown};

#[derive(Parser)]
#[command(name = "health-gateway")]
#[command(about = "Liveness gateway for downstream services", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("health-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        services = config.services.len(),
        probe_timeout_ms = config.probe.timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, config.clone());
            (updates, Some(watcher.run()?))
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = GatewayServer::new(config);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
