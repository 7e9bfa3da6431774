//! Failover reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                FAILOVER PROXY                │
//!                        │                                              │
//!     Client Request     │  ┌─────────┐    ┌──────────┐    ┌──────────┐ │
//!     ───────────────────┼─▶│  http   │───▶│ failover │───▶│  target  │─┼──▶ Active
//!                        │  │ server  │    │ snapshot │    │ upstream │ │    Target
//!                        │  └────┬────┘    └────▲─────┘    └──────────┘ │
//!                        │       │              │ switch_to             │
//!     GET /log (ws)      │       │         ┌────┴────────┐   ┌────────┐ │
//!     ◀──────────────────┼───────┘         │ coordinator │──▶│ health │─┼──▶ GET /health/
//!                        │   events hub ◀──│  (interval) │   │ prober │ │
//!                        │                 └─────────────┘   └────────┘ │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use failover_proxy::config::{load_config, ObservabilityConfig};
use failover_proxy::lifecycle::{bootstrap, signals, Shutdown};
use failover_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "failover-proxy")]
#[command(about = "Reverse proxy that fails over between an ordered set of targets", long_about = None)]
struct Args {
    /// Path to the configuration file (YAML or TOML).
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Listen port, overriding the configured bind address.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            let _ = logging::init(&ObservabilityConfig::default());
            tracing::error!(path = %args.config.display(), error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    if let Some(port) = args.port {
        config.listener.set_port(port);
    }

    logging::init(&config.observability)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        targets = ?config.targets,
        interval_secs = config.interval,
        "failover-proxy starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server = match bootstrap(&config, &shutdown).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        active = %server.failover().active().await,
        "Reverse proxy up and running"
    );

    signals::spawn_signal_handler(shutdown.clone());
    server.run(listener, shutdown.subscribe()).await?;

    shutdown.trigger();
    tracing::info!("Shutdown complete");
    Ok(())
}
