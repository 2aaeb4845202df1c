//! Resource router server.
//!
//! Loads a TOML config, registers the resources it declares, serves them on
//! axum, and exposes the schema for client-side reverse resolution.
//!
//! ```text
//!   config.toml ──▶ startup ──▶ SchemaRegistry (frozen)
//!                                   │
//!                  ┌────────────────┴───────────────┐
//!                  ▼                                ▼
//!           axum routes per endpoint         GET /schema (JSON)
//!                  │                                │
//!                  ▼                                ▼
//!     Dispatcher: handler / 405 / 500      resolve-cli / clients
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use resource_router::config::{load_config, RouterConfig};
use resource_router::lifecycle::{signals, startup, Shutdown};
use resource_router::observability::{logging, metrics};
use resource_router::HttpServer;

#[derive(Parser)]
#[command(name = "resource-router")]
#[command(about = "Serve a declarative resource schema", long_about = None)]
struct Cli {
    /// Path to the TOML config file; defaults are used when omitted.
    #[arg(short, long, env = "RESOURCE_ROUTER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init(&config.observability)?;
    tracing::info!("resource-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        resources = config.resources.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let api = Arc::new(startup::build_api(&config)?);

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config, api)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
