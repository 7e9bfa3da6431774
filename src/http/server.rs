//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router: event stream route + forwarding fallback
//! - Wire up middleware (tracing, request ID)
//! - Serve with connect info until shutdown

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::events::{EventHub, EventSink};
use crate::failover::FailoverState;
use crate::http::forward::forward_request;
use crate::http::request::{request_id_header, UuidRequestId};
use crate::http::websocket::event_stream;
use crate::lifecycle::Shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub failover: Arc<FailoverState>,
    pub events: EventSink,
    pub hub: EventHub,
    pub shutdown: Shutdown,
}

/// HTTP server for the failover proxy.
pub struct HttpServer {
    router: Router,
    failover: Arc<FailoverState>,
}

impl HttpServer {
    /// Create a server serving the event stream at `events_path` and
    /// forwarding everything else.
    pub fn new(state: AppState, events_path: &str) -> Self {
        let failover = state.failover.clone();
        let router = Self::build_router(events_path, state);
        Self { router, failover }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(events_path: &str, state: AppState) -> Router {
        Router::new()
            .route(events_path, get(event_stream))
            .fallback(forward_request)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(SetRequestIdLayer::new(request_id_header(), UuidRequestId))
    }

    /// Shared failover state (read-only outside the coordinator).
    pub fn failover(&self) -> Arc<FailoverState> {
        self.failover.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, EventStream};
    use crate::health::testing::ScriptedProber;
    use crate::http::request::X_REQUEST_ID;
    use crate::target::registry::testing::{addresses, client};
    use crate::target::TargetSet;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    // Nothing listens on the discard port.
    const DEAD: &str = "http://127.0.0.1:9";

    async fn server() -> (HttpServer, EventStream) {
        let prober = ScriptedProber::healthy(&[DEAD]);
        let set = TargetSet::build(&addresses(&[DEAD]), &prober, client(), Duration::from_secs(1))
            .await
            .unwrap();
        let (events, stream) = EventSink::channel(8);
        let state = AppState {
            failover: Arc::new(FailoverState::new(set)),
            events,
            hub: EventHub::new(8),
            shutdown: Shutdown::new(),
        };
        (HttpServer::new(state, "/log"), stream)
    }

    #[tokio::test]
    async fn test_unreachable_target_is_bad_gateway() {
        let (server, mut stream) = server().await;
        let request = Request::builder().uri("/a/b?c=d").body(Body::empty()).unwrap();

        let response = server.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().contains_key(X_REQUEST_ID));

        let event = stream.try_next().unwrap();
        assert!(matches!(event, Event::Forwarded { ref path, .. } if path == "/a/b?c=d"));
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let (server, _stream) = server().await;
        let request = Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, "given-id")
            .body(Body::empty())
            .unwrap();

        let response = server.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[X_REQUEST_ID], "given-id");
    }

    #[tokio::test]
    async fn test_event_path_is_never_forwarded() {
        let (server, mut stream) = server().await;
        let request = Request::builder().uri("/log").body(Body::empty()).unwrap();

        let response = server.router.clone().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
        assert!(stream.try_next().is_none());
    }
}
