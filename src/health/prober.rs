//! Active health probing.
//!
//! # Responsibilities
//! - Issue one `GET {target}{path}` with a bounded timeout
//! - Report healthy only for an exact `200 OK`
//!
//! # Design Decisions
//! - Non-200, transport errors and timeouts are all "unhealthy"; the reason
//!   is logged, never returned to callers
//! - Stateless: the same prober serves startup registration and the
//!   failover loop

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::future::Future;
use std::time::Duration;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::observability::metrics;
use crate::target::{HttpClient, Target};

/// A single health check against one target.
pub trait Probe: Send + Sync + 'static {
    /// Returns true when the target answered healthy.
    fn probe(&self, target: &Target) -> impl Future<Output = bool> + Send;
}

/// Why a probe reported unhealthy.
#[derive(Debug, thiserror::Error)]
pub enum ProbeFailure {
    #[error("could not build probe request: {0}")]
    Request(String),

    #[error("received code {0} instead of 200")]
    Status(StatusCode),

    #[error("connection error: {0}")]
    Transport(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// HTTP prober hitting the configured health path.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: HttpClient,
    path: String,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(config: &HealthCheckConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(config.timeout()));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            path: config.path.clone(),
            timeout: config.timeout(),
        }
    }

    /// Run one probe and return the failure reason, if any.
    pub async fn check(&self, target: &Target) -> Result<(), ProbeFailure> {
        let request = Request::builder()
            .method("GET")
            .uri(target.health_url(&self.path))
            .header("user-agent", "failover-proxy-health-check")
            .body(Body::empty())
            .map_err(|e| ProbeFailure::Request(e.to_string()))?;

        match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) if response.status() == StatusCode::OK => Ok(()),
            Ok(Ok(response)) => Err(ProbeFailure::Status(response.status())),
            Ok(Err(e)) => Err(ProbeFailure::Transport(e.to_string())),
            Err(_) => Err(ProbeFailure::Timeout(self.timeout)),
        }
    }
}

impl Probe for HttpProber {
    async fn probe(&self, target: &Target) -> bool {
        let healthy = match self.check(target).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(target = %target, error = %e, "Health check failed");
                false
            }
        };
        metrics::record_probe(target, healthy);
        healthy
    }
}
