//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Failover scan (failover::coordinator):
//!     first sweep over the target set → back-to-back probes
//!     every further attempt → backoff.rs (exponential, capped at interval)
//! ```
//!
//! # Design Decisions
//! - The scan never gives up; backoff only spaces out probes
//! - Jitter shortens delays so the cap is a hard upper bound

pub mod backoff;

pub use backoff::{calculate_backoff, ScanBackoff};
