//! EASY gateway binary.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser / page renderer
//!          │
//!          ▼
//!  ┌────────────────────────────────────────────────────────────┐
//!  │                        EASY GATEWAY                        │
//!  │                                                            │
//!  │  http::server ──▶ http::routes ──▶ http::gateway           │
//!  │       │           http::pages  ──▶ loaders ──┘   │         │
//!  │       │                                          ▼         │
//!  │       │              target · cookies · body · invoker ────┼──▶ Backend API
//!  │       ▼                                          │         │
//!  │  http::response ◀────────────────────────────────┘         │
//!  │                                                            │
//!  │  config (file + watcher + SIGHUP)   observability          │
//!  │  routing::table (17 routes)         lifecycle              │
//!  └────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use easy_gateway::config::{self, loader::load_config, watcher::ConfigWatcher, GatewayConfig};
use easy_gateway::lifecycle::{signals, Shutdown};
use easy_gateway::observability::{logging, metrics};
use easy_gateway::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "easy-gateway", version, about = "Authenticated gateway for the EASY marketplace")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "EASY_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut gateway_config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        gateway_config.listener.bind_address = bind;
    }

    logging::init_logging(&gateway_config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "easy-gateway starting");
    tracing::info!(
        bind_address = %gateway_config.listener.bind_address,
        backend_env = %gateway_config.backend.base_url_env,
        backend_url = ?gateway_config.backend.base_url,
        request_timeout_secs = gateway_config.timeouts.request_secs,
        "Configuration loaded"
    );

    if gateway_config.observability.metrics_enabled {
        match gateway_config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %gateway_config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&gateway_config.listener.bind_address).await?;
    let shared = config::shared(gateway_config);

    // Held for the lifetime of the server; dropping it stops watching.
    let _watcher = match &cli.config {
        Some(path) => match ConfigWatcher::new(path, shared.clone()).run() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(error = %e, "Config watcher unavailable, SIGHUP reload still works");
                None
            }
        },
        None => None,
    };

    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(shared.clone())?;
    let shutdown = Shutdown::new();
    let signal = shutdown.signal();
    tokio::spawn(signals::listen(shutdown, cli.config.clone(), shared));

    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
