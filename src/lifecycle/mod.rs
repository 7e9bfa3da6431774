//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Probe & register targets → Spawn coordinator + hub
//!     → HttpServer ready to bind
//!
//! Shutdown (shutdown.rs):
//!     trigger() → server drains, coordinator and hub leave their loops
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then targets, then background tasks
//! - A target that is down at boot aborts startup

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bootstrap, StartupError};
