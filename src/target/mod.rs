//! Target subsystem.
//!
//! # Data Flow
//! ```text
//! config.targets (ordered strings)
//!     → endpoint.rs (parse & validate each address)
//!     → health::Probe (one startup probe per target)
//!     → registry.rs (TargetSet: fixed, index-aligned targets + proxies)
//!     → upstream.rs (UpstreamProxy: one forwarding proxy per target)
//! ```
//!
//! # Design Decisions
//! - The set is built once and never mutated
//! - Order is the failover scan order, not a priority

pub mod endpoint;
pub mod registry;
pub mod upstream;

pub use endpoint::{Target, TargetError};
pub use registry::{RegistryError, TargetSet};
pub use upstream::{HttpClient, ProxyError, UpstreamProxy};
