//! Failover reverse proxy library.
//!
//! Forwards every request to a single active target chosen from a fixed,
//! ordered set, and fails over to the next healthy target when the active
//! one stops answering its health check.

pub mod config;
pub mod events;
pub mod failover;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod target;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::{bootstrap, Shutdown};
