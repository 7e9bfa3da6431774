//! Active-target selection and failover.
//!
//! # Data Flow
//! ```text
//! coordinator.rs (background task, sole writer)
//!     sleep(interval) → probe active
//!     → healthy: nothing
//!     → unhealthy: advance cursor + probe until healthy → switch_to → Event
//!
//! http::forward (per request, reader)
//!     state.snapshot() → Arc<UpstreamProxy> → lock released → forward
//! ```
//!
//! # Design Decisions
//! - Exactly one active target at any instant, always a member of the set
//! - The lock is never held across a probe or an upstream request

pub mod coordinator;
pub mod state;

pub use coordinator::{CycleOutcome, FailoverCoordinator};
pub use state::{FailoverState, Selection};
