//! Failover coordinator.
//!
//! # Responsibilities
//! - Periodically probe the active target
//! - On failure, scan the target set from the cursor until a target answers
//! - Switch the active target and emit a switch event
//!
//! # Design Decisions
//! - Two states per cycle: Stable (active target healthy) and Failing-over
//! - The scan never gives up; after one full sweep it backs off, capped at
//!   the monitoring interval
//! - The scan continues from the last cursor position, so repeated failures
//!   rotate through the set instead of restarting at index 0
//! - Landing back on the target that just failed is a recovery, not a switch
//! - Sleep and scan both stop on shutdown

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::events::{Event, EventSink};
use crate::failover::FailoverState;
use crate::health::Probe;
use crate::observability::metrics;
use crate::resilience::ScanBackoff;
use crate::target::Target;

/// Result of one monitoring cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Active target answered healthy.
    Stable,
    /// The scan came back around to the active target and it answered.
    Recovered(Arc<Target>),
    /// A different target is now active.
    Switched { from: Arc<Target>, to: Arc<Target> },
}

/// Background task that owns all writes to the failover state.
pub struct FailoverCoordinator<P> {
    state: Arc<FailoverState>,
    prober: Arc<P>,
    events: EventSink,
    interval: Duration,
    backoff: ScanBackoff,
}

impl<P: Probe> FailoverCoordinator<P> {
    pub fn new(
        state: Arc<FailoverState>,
        prober: Arc<P>,
        events: EventSink,
        interval: Duration,
        backoff: ScanBackoff,
    ) -> Self {
        Self {
            state,
            prober,
            events,
            interval,
            backoff,
        }
    }

    /// Run until shutdown: sleep, probe, fail over when needed.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = ?self.interval,
            targets = self.state.targets().len(),
            "Failover coordinator starting"
        );

        loop {
            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => break,
            }

            tokio::select! {
                _ = self.cycle() => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(events_dropped = self.events.dropped(), "Failover coordinator stopped");
    }

    /// One monitoring cycle without the leading sleep.
    ///
    /// Does not return while every target is down.
    pub async fn cycle(&self) -> CycleOutcome {
        let current = self.state.active().await;
        if self.prober.probe(&current).await {
            tracing::trace!(target = %current, "Active target healthy");
            return CycleOutcome::Stable;
        }

        tracing::warn!(target = %current, "Active target failed health check, starting failover");
        let index = self.scan().await;

        match self.state.switch_to(index).await {
            Some(from) => {
                let to = self.state.targets().target(index).clone();
                tracing::info!(from = %from, to = %to, "Switching active target");
                metrics::record_failover(&from, &to);
                self.events.emit(Event::Switched {
                    from: from.clone(),
                    to: to.clone(),
                });
                CycleOutcome::Switched { from, to }
            }
            None => {
                tracing::info!(target = %current, "Active target recovered during failover scan");
                self.events.emit(Event::Recovered {
                    target: current.clone(),
                });
                CycleOutcome::Recovered(current)
            }
        }
    }

    /// Advance the cursor until a target answers healthy; returns its index.
    async fn scan(&self) -> usize {
        let sweep = self.state.targets().len() as u32;
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            if attempt > sweep {
                let delay = self.backoff.delay(attempt - sweep);
                tracing::debug!(attempt, delay = ?delay, "All targets down, backing off");
                time::sleep(delay).await;
            }

            let cursor = self.state.advance_cursor().await;
            let candidate = self.state.targets().target(cursor).clone();
            if self.prober.probe(&candidate).await {
                return cursor;
            }
            tracing::debug!(target = %candidate, attempt, "Failover candidate unhealthy");
        }
    }
}
