//! Activity events.
//!
//! # Data Flow
//! ```text
//! failover::coordinator ──┐
//!                         ├─→ sink.rs (bounded mpsc, drop newest when full)
//! http::forward ──────────┘       → hub.rs (broadcast, drop oldest per subscriber)
//!                                     → http::websocket (one text frame per event)
//! ```
//!
//! # Design Decisions
//! - Producers never block on telemetry
//! - Events are plain text on the wire; no structured payload

pub mod hub;
pub mod sink;

pub use hub::EventHub;
pub use sink::{Event, EventSink, EventStream};
