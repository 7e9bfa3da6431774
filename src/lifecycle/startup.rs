//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build the target set (probing every target once)
//! - Start background tasks (failover coordinator, event hub)
//! - Return the HTTP server, ready to bind
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Background tasks subscribe to the shared `Shutdown`

use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{validate_config, ProxyConfig, TimeoutConfig, ValidationError};
use crate::events::{EventHub, EventSink};
use crate::failover::{FailoverCoordinator, FailoverState};
use crate::health::HttpProber;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::resilience::ScanBackoff;
use crate::target::{HttpClient, RegistryError, TargetSet};

/// Errors that prevent the proxy from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Config(Vec<ValidationError>),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Upstream client shared by every forwarding proxy.
pub fn upstream_client(timeouts: &TimeoutConfig) -> HttpClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
    Client::builder(TokioExecutor::new()).build(connector)
}

/// Build every subsystem, spawn background tasks and return the server.
pub async fn bootstrap(config: &ProxyConfig, shutdown: &Shutdown) -> Result<HttpServer, StartupError> {
    validate_config(config).map_err(StartupError::Config)?;

    let prober = Arc::new(HttpProber::new(&config.health_check));
    let targets = TargetSet::build(
        &config.targets,
        prober.as_ref(),
        upstream_client(&config.timeouts),
        Duration::from_secs(config.timeouts.request_secs),
    )
    .await?;

    let failover = Arc::new(FailoverState::new(targets));
    let first = failover.active().await;
    metrics::record_active_target(&first, true);
    let registered: Vec<String> = failover.targets().targets().map(ToString::to_string).collect();
    tracing::info!(target = %first, targets = ?registered, "Active target selected");

    let (sink, stream) = EventSink::channel(config.events.sink_capacity);
    let hub = EventHub::new(config.events.broadcast_capacity);
    tokio::spawn(hub.clone().run(stream, shutdown.subscribe()));

    let backoff_max = config
        .health_check
        .backoff_max_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.interval());
    let backoff = ScanBackoff::new(
        Duration::from_millis(config.health_check.backoff_base_ms),
        backoff_max,
    );
    let coordinator = FailoverCoordinator::new(
        failover.clone(),
        prober,
        sink.clone(),
        config.interval(),
        backoff,
    );
    tokio::spawn(coordinator.run(shutdown.subscribe()));

    let state = AppState {
        failover,
        events: sink,
        hub,
        shutdown: shutdown.clone(),
    };
    Ok(HttpServer::new(state, &config.events.path))
}
