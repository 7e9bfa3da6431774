//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate that every target parses into a proxyable endpoint
//! - Validate value ranges (interval > 0, timeouts > 0, capacities > 0)
//! - Detect conflicting paths (event stream vs. health probe)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;
use crate::target::Target;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("at least one target is required")]
    NoTargets,

    #[error("invalid target {index} ({address}): {reason}")]
    InvalidTarget {
        index: usize,
        address: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must start with '/' (got {value:?})")]
    RelativePath { field: &'static str, value: String },

    #[error("events.path {0:?} collides with the health check path")]
    PathCollision(String),

    #[error("{field} is not a socket address: {value:?}")]
    BadAddress { field: &'static str, value: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.targets.is_empty() {
        errors.push(ValidationError::NoTargets);
    }
    for (index, address) in config.targets.iter().enumerate() {
        if let Err(e) = Target::parse(address) {
            errors.push(ValidationError::InvalidTarget {
                index,
                address: address.clone(),
                reason: e.to_string(),
            });
        }
    }

    let positive = [
        ("interval", config.interval),
        ("health_check.timeout_secs", config.health_check.timeout_secs),
        ("health_check.backoff_base_ms", config.health_check.backoff_base_ms),
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }
    if config.health_check.backoff_max_ms == Some(0) {
        errors.push(ValidationError::Zero { field: "health_check.backoff_max_ms" });
    }
    if config.events.sink_capacity == 0 {
        errors.push(ValidationError::Zero { field: "events.sink_capacity" });
    }
    if config.events.broadcast_capacity == 0 {
        errors.push(ValidationError::Zero { field: "events.broadcast_capacity" });
    }

    for (field, value) in [
        ("health_check.path", &config.health_check.path),
        ("events.path", &config.events.path),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                field,
                value: value.clone(),
            });
        }
    }
    if config.events.path.trim_end_matches('/') == config.health_check.path.trim_end_matches('/') {
        errors.push(ValidationError::PathCollision(config.events.path.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
