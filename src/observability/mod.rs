//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`target`, `from`, `to`) rather than formatted strings
//! - Request ID flows through every request span
//! - The user-facing event stream lives in `events`, not here

pub mod logging;
pub mod metrics;
