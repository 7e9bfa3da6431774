//! Per-target forwarding proxy.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the target (scheme, authority, base path)
//! - Rewrite the Host header and append `x-forwarded-for`
//! - Strip hop-by-hop headers in both directions
//! - Stream the upstream response back without buffering
//!
//! # Design Decisions
//! - One instance per target, built once by the registry
//! - No retry on a different target; errors map to 502/504

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Response, Uri};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use crate::http::response::strip_hop_by_hop;
use crate::target::Target;

/// Shared upstream HTTP client type.
pub type HttpClient = Client<HttpConnector, Body>;

/// Errors surfaced to the client while forwarding.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("could not build upstream URI: {0}")]
    InvalidUri(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

/// Forwarding proxy bound to a single target.
#[derive(Debug)]
pub struct UpstreamProxy {
    target: Arc<Target>,
    client: HttpClient,
    request_timeout: Duration,
}

impl UpstreamProxy {
    pub fn new(target: Arc<Target>, client: HttpClient, request_timeout: Duration) -> Self {
        Self {
            target,
            client,
            request_timeout,
        }
    }

    pub fn target(&self) -> &Arc<Target> {
        &self.target
    }

    /// Map an inbound URI onto this target.
    pub fn rewrite_uri(&self, uri: &Uri) -> Result<Uri, ProxyError> {
        let path = join_paths(self.target.base_path(), uri.path());
        let query = match (self.target.url().query(), uri.query()) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => Some(format!("{}&{}", a, b)),
            (Some(a), _) if !a.is_empty() => Some(a.to_string()),
            (_, Some(b)) if !b.is_empty() => Some(b.to_string()),
            _ => None,
        };

        let mut rewritten = format!("http://{}{}", self.target.authority(), path);
        if let Some(query) = query {
            rewritten.push('?');
            rewritten.push_str(&query);
        }

        rewritten
            .parse::<Uri>()
            .map_err(|e| ProxyError::InvalidUri(e.to_string()))
    }

    /// Forward one request to the target and return its response.
    pub async fn forward(
        &self,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<Body>, ProxyError> {
        let (mut parts, body) = request.into_parts();

        parts.uri = self.rewrite_uri(&parts.uri)?;
        strip_hop_by_hop(&mut parts.headers);

        let host = HeaderValue::from_str(self.target.authority())
            .map_err(|e| ProxyError::InvalidUri(e.to_string()))?;
        parts.headers.insert(header::HOST, host);

        if let Some(addr) = client_addr {
            let forwarded = match parts
                .headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
            {
                Some(prior) => format!("{}, {}", prior, addr.ip()),
                None => addr.ip().to_string(),
            };
            if let Ok(value) = HeaderValue::from_str(&forwarded) {
                parts.headers.insert("x-forwarded-for", value);
            }
        }

        let request = Request::from_parts(parts, body);
        let response: Response<Incoming> = match time::timeout(self.request_timeout, self.client.request(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(ProxyError::Upstream(e.to_string())),
            Err(_) => return Err(ProxyError::Timeout(self.request_timeout)),
        };

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Join a base path and a request path with exactly one slash.
fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}
