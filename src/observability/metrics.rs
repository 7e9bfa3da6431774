//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define proxy metrics (requests, latency, probes, failovers, dropped events)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `proxy_requests_total` (counter): forwarded requests by method, status, target
//! - `proxy_request_duration_seconds` (histogram): forwarding latency
//! - `proxy_probes_total` (counter): health probes by target and result
//! - `proxy_failovers_total` (counter): switches by source and destination
//! - `proxy_active_target` (gauge): 1 for the active target, 0 otherwise
//! - `proxy_events_dropped_total` (counter): events lost to a full sink
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs a recorder

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::target::Target;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, target: &Target, start: Instant) {
    let target = target.to_string();
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "target" => target.clone()
    )
    .increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "target" => target)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_probe(target: &Target, healthy: bool) {
    let result = if healthy { "healthy" } else { "unhealthy" };
    metrics::counter!("proxy_probes_total", "target" => target.to_string(), "result" => result)
        .increment(1);
}

pub fn record_failover(from: &Target, to: &Target) {
    metrics::counter!(
        "proxy_failovers_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
    record_active_target(from, false);
    record_active_target(to, true);
}

pub fn record_active_target(target: &Target, active: bool) {
    metrics::gauge!("proxy_active_target", "target" => target.to_string())
        .set(if active { 1.0 } else { 0.0 });
}

pub fn record_event_dropped() {
    metrics::counter!("proxy_events_dropped_total").increment(1);
}
