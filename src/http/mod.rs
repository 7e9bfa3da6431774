//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → GET {events.path}: websocket.rs (live event stream)
//!     → anything else:     forward.rs (snapshot active target)
//!         → target::UpstreamProxy (rewrite, forward, stream back)
//!         → response.rs (hop-by-hop stripping, gateway errors)
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
