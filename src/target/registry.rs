//! Target registry.
//!
//! # Responsibilities
//! - Resolve configured addresses into an ordered, fixed target set
//! - Probe every target once before accepting it
//! - Build one forwarding proxy per accepted target
//!
//! # Design Decisions
//! - All-or-nothing: any parse or probe failure aborts construction, so the
//!   proxy never starts with an unverified target
//! - Targets and proxies are index-aligned; the set is never mutated

use std::sync::Arc;
use std::time::Duration;

use crate::health::Probe;
use crate::target::{HttpClient, Target, TargetError, UpstreamProxy};

/// Fatal errors while building the target set.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no targets configured")]
    Empty,

    #[error("invalid target {address:?}: {source}")]
    InvalidTarget {
        address: String,
        #[source]
        source: TargetError,
    },

    #[error("target {0} failed its startup health check")]
    Unhealthy(String),
}

/// Ordered, immutable set of targets with their forwarding proxies.
#[derive(Debug)]
pub struct TargetSet {
    proxies: Vec<Arc<UpstreamProxy>>,
}

impl TargetSet {
    /// Parse, probe and register every address, in order.
    pub async fn build<P: Probe>(
        addresses: &[String],
        prober: &P,
        client: HttpClient,
        request_timeout: Duration,
    ) -> Result<Self, RegistryError> {
        if addresses.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut proxies = Vec::with_capacity(addresses.len());
        for address in addresses {
            let target = Target::parse(address).map_err(|source| RegistryError::InvalidTarget {
                address: address.clone(),
                source,
            })?;

            if !prober.probe(&target).await {
                return Err(RegistryError::Unhealthy(target.to_string()));
            }

            tracing::info!(target = %target, "Target registered");
            proxies.push(Arc::new(UpstreamProxy::new(
                Arc::new(target),
                client.clone(),
                request_timeout,
            )));
        }

        Ok(Self { proxies })
    }

    /// Number of targets (always ≥ 1).
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Forwarding proxy at `index`, wrapping modulo the set size.
    pub fn proxy(&self, index: usize) -> &Arc<UpstreamProxy> {
        &self.proxies[index % self.proxies.len()]
    }

    /// Target at `index`, wrapping modulo the set size.
    pub fn target(&self, index: usize) -> &Arc<Target> {
        self.proxy(index).target()
    }

    pub fn targets(&self) -> impl Iterator<Item = &Arc<Target>> {
        self.proxies.iter().map(|p| p.target())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use hyper_util::client::legacy::{connect::HttpConnector, Client};
    use hyper_util::rt::TokioExecutor;

    pub fn client() -> HttpClient {
        Client::builder(TokioExecutor::new()).build(HttpConnector::new())
    }

    pub fn addresses(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }
}
