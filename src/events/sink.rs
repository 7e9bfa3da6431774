//! Bounded, best-effort event sink.
//!
//! # Responsibilities
//! - Carry activity events from the coordinator and forwarder to the hub
//! - Never block a producer
//!
//! # Design Decisions
//! - Overflow drops the newest event and counts it; telemetry is not a
//!   guaranteed-delivery log
//! - A closed receiver is not an error for producers

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::observability::metrics;
use crate::target::Target;

/// One piece of proxy activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A request was handed to a target.
    Forwarded { path: String, target: Arc<Target> },
    /// The active target changed.
    Switched { from: Arc<Target>, to: Arc<Target> },
    /// The active target failed a check, then answered again before any
    /// other target did. The selection is unchanged.
    Recovered { target: Arc<Target> },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Forwarded { path, target } => {
                write!(f, "Proxying request: {} -> {}", path, target)
            }
            Event::Switched { from, to } => {
                write!(f, "Switching active target to: {} (from {})", to, from)
            }
            Event::Recovered { target } => {
                write!(f, "Active target recovered: {}", target)
            }
        }
    }
}

/// Producer half. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<Event>,
    dropped: Arc<AtomicU64>,
}

/// Consumer half, drained by the hub.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<Event>,
}

impl EventSink {
    /// Create a sink holding at most `capacity` undelivered events.
    pub fn channel(capacity: usize) -> (EventSink, EventStream) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            EventSink {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            EventStream { rx },
        )
    }

    /// Push an event without waiting. Returns false if it was not queued.
    pub fn emit(&self, event: Event) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                metrics::record_event_dropped();
                tracing::debug!(event = %event, "Event sink full, dropping event");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Events dropped because the sink was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl EventStream {
    /// Next event, or `None` once every sink is gone.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Next already-queued event, without waiting.
    #[cfg(test)]
    pub(crate) fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}
