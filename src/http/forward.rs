//! Request forwarder.
//!
//! Snapshots the active target, emits a "forwarded" event and hands the
//! request to that target's forwarding proxy. The state lock is released
//! before the upstream call, so a concurrent failover never blocks or
//! corrupts an in-flight request; it only affects requests that arrive
//! after the switch.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::time::Instant;

use crate::events::Event;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Fallback handler: every path except the event stream ends up here.
pub async fn forward_request(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().to_string();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let upstream = state.failover.snapshot().await;
    let target = upstream.target().clone();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        target = %target,
        "Proxying request"
    );
    state.events.emit(Event::Forwarded {
        path,
        target: target.clone(),
    });

    match upstream.forward(request, client_addr).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), &target, start_time);
            response
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, target = %target, error = %e, "Upstream error");
            metrics::record_request(&method, e.status().as_u16(), &target, start_time);
            e.into_response()
        }
    }
}
