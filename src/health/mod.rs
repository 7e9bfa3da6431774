//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (target::registry):
//!     each configured target → Probe → accept or abort
//!
//! Runtime (failover::coordinator):
//!     periodic timer → Probe active target
//!     → on failure: Probe candidates in scan order
//! ```
//!
//! # Design Decisions
//! - A probe is one GET with a timeout; there are no thresholds or hysteresis
//! - `Probe` is a trait so the coordinator can be driven by a scripted prober

pub mod prober;

pub use prober::{HttpProber, Probe, ProbeFailure};

#[cfg(test)]
pub(crate) use prober::testing;
