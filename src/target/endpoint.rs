//! Target abstraction.
//!
//! # Responsibilities
//! - Represent a single backend endpoint (scheme, host, port, base path)
//! - Validate configured addresses before they enter the target set
//! - Pre-compute the display form and Host authority used on every request

use std::fmt;
use url::Url;

/// Reasons a configured address is not a usable target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported scheme {0:?} (only http is proxied)")]
    UnsupportedScheme(String),

    #[error("missing host")]
    MissingHost,
}

/// A single backend endpoint. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    url: Url,
    /// `url` without query or trailing slash, used for display and joining.
    base: String,
    /// `host[:port]`, sent as the Host header upstream.
    authority: String,
}

impl Target {
    /// Parse and validate a configured backend address.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw.trim())?;
        if url.scheme() != "http" {
            return Err(TargetError::UnsupportedScheme(url.scheme().to_string()));
        }
        let host = url.host_str().ok_or(TargetError::MissingHost)?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let mut bare = url.clone();
        bare.set_query(None);
        bare.set_fragment(None);
        let base = bare.as_str().trim_end_matches('/').to_string();

        Ok(Self {
            url,
            base,
            authority,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host header value for requests sent to this target.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Base path of the target ("" when the target is a bare origin).
    pub fn base_path(&self) -> &str {
        self.url.path().trim_end_matches('/')
    }

    /// Absolute URL of the health endpoint, e.g. `http://host:8022/health/`.
    pub fn health_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
