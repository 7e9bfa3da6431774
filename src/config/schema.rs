//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.
//! `targets` and `interval` are required; every other section has defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the failover proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Ordered backend base URLs (e.g., "http://localhost:8022").
    pub targets: Vec<String>,

    /// Seconds between health checks of the active target.
    pub interval: u64,

    /// Listener configuration.
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Health probe settings.
    #[serde(default)]
    pub health_check: HealthCheckConfig,

    /// Upstream timeouts.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Event stream settings.
    #[serde(default)]
    pub events: EventsConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Create a config with the required fields and default sections.
    pub fn new(targets: Vec<String>, interval: u64) -> Self {
        Self {
            targets,
            interval,
            listener: ListenerConfig::default(),
            health_check: HealthCheckConfig::default(),
            timeouts: TimeoutConfig::default(),
            events: EventsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    /// Monitoring interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8021").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8021".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Replace the port of `bind_address`, keeping its host.
    pub fn set_port(&mut self, port: u16) {
        let host = match self.bind_address.rsplit_once(':') {
            Some((host, _)) => host,
            None => self.bind_address.as_str(),
        };
        self.bind_address = format!("{}:{}", host, port);
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Path to probe on every target.
    pub path: String,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,

    /// First backoff step of the failover scan, in milliseconds.
    pub backoff_base_ms: u64,

    /// Upper bound for the scan backoff in milliseconds.
    /// Defaults to the monitoring interval when unset.
    pub backoff_max_ms: Option<u64>,
}

impl HealthCheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            path: "/health/".to_string(),
            timeout_secs: 5,
            backoff_base_ms: 100,
            backoff_max_ms: None,
        }
    }
}

/// Timeout configuration for upstream requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (until response headers arrive) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Event stream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Path serving the WebSocket event stream. Never forwarded.
    pub path: String,

    /// Capacity of the bounded sink producers push into.
    pub sink_capacity: usize,

    /// Per-subscriber buffer of the broadcaster.
    pub broadcast_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            path: "/log".to_string(),
            sink_capacity: 64,
            broadcast_capacity: 256,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty for terminals, JSON for log shipping.
    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
