//! Edge gateway
//!
//! Serves a single-page web application and the two things it needs at
//! runtime from one listener.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                 EDGE GATEWAY                  │
//!                         │                                               │
//!   Client Request        │  ┌──────────┐    ┌──────────┐                 │
//!   ──────────────────────┼─▶│   http   │───▶│ routing  │                 │
//!                         │  │  server  │    │ classify │                 │
//!                         │  └──────────┘    └────┬─────┘                 │
//!                         │         ┌─────────────┼──────────────┐        │
//!                         │         ▼             ▼              ▼        │
//!                         │  ┌────────────┐ ┌───────────┐ ┌────────────┐  │
//!                         │  │  config    │ │   proxy   │ │   static   │  │
//!                         │  │  document  │ │  handler  │ │   files    │  │
//!                         │  └────────────┘ └─────┬─────┘ └─────┬──────┘  │
//!                         │                       │             │         │
//!                         │                       ▼             ▼         │
//!                         │                 ┌───────────┐ ┌────────────┐  │
//!                         │                 │ upstream  │ │   assets   │  │     Upstream
//!                         │                 │  client   │─┼────────────┼──┼───▶ API origin
//!                         │                 └───────────┘ └────────────┘  │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gateway::config::{load_config, ConfigOverrides};
use edge_gateway::lifecycle::{signals, Shutdown};
use edge_gateway::observability::{logging, metrics};
use edge_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "edge-gateway")]
#[command(about = "Static file server with an API relay and a storage config endpoint", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8080
    #[arg(short, long)]
    bind: Option<String>,

    /// Upstream API origin, e.g. https://api.example.com
    #[arg(short, long)]
    upstream: Option<String>,

    /// Directory to serve static files from
    #[arg(short, long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        bind_address: cli.bind,
        upstream_url: cli.upstream,
        static_root: cli.root,
    };

    // Logging is configured from the result, so errors here go to stderr.
    let config = match load_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("edge-gateway: {e}");
            return ExitCode::from(2);
        }
    };

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "edge-gateway starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(
                bind_address = %config.listener.bind_address,
                error = %e,
                "Failed to bind listener"
            );
            return ExitCode::FAILURE;
        }
    };

    let server = match HttpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build server");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    if let Err(e) = server.run(listener, rx).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
