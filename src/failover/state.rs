//! Active target state.
//!
//! # States
//! - `active`: index of the target receiving traffic
//! - `cursor`: index the next failover scan continues from
//!
//! # Transitions
//! ```text
//! advance_cursor: cursor = (cursor + 1) mod N
//! switch_to(i):   active = i, cursor = i
//! ```
//!
//! # Design Decisions
//! - One reader/writer lock over both fields so readers never see a torn pair
//! - Locks are held only to copy indices; callers clone the `Arc` they need
//!   and release before any network I/O
//! - Only the coordinator writes

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::target::{Target, TargetSet, UpstreamProxy};

/// Snapshot of the mutable selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub active: usize,
    pub cursor: usize,
}

/// Owned failover state: the fixed target set plus the current selection.
#[derive(Debug)]
pub struct FailoverState {
    targets: TargetSet,
    selection: RwLock<Selection>,
}

impl FailoverState {
    /// Start with the first registered target active.
    pub fn new(targets: TargetSet) -> Self {
        Self {
            targets,
            selection: RwLock::new(Selection { active: 0, cursor: 0 }),
        }
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    #[cfg(test)]
    pub(crate) async fn selection(&self) -> Selection {
        *self.selection.read().await
    }

    /// Forwarding proxy of the active target.
    pub async fn snapshot(&self) -> Arc<UpstreamProxy> {
        let active = self.selection.read().await.active;
        self.targets.proxy(active).clone()
    }

    /// The active target.
    pub async fn active(&self) -> Arc<Target> {
        let active = self.selection.read().await.active;
        self.targets.target(active).clone()
    }

    /// Move the cursor one step and return the new position.
    pub(crate) async fn advance_cursor(&self) -> usize {
        let mut selection = self.selection.write().await;
        selection.cursor = (selection.cursor + 1) % self.targets.len();
        selection.cursor
    }

    /// Make `index` active. Returns the previous target if it changed.
    pub(crate) async fn switch_to(&self, index: usize) -> Option<Arc<Target>> {
        let index = index % self.targets.len();
        let mut selection = self.selection.write().await;
        selection.cursor = index;
        if selection.active == index {
            return None;
        }
        let previous = self.targets.target(selection.active).clone();
        selection.active = index;
        Some(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::testing::ScriptedProber;
    use crate::target::registry::testing::{addresses, client};
    use std::time::Duration;

    const A: &str = "http://a:1";
    const B: &str = "http://b:2";
    const C: &str = "http://c:3";

    async fn state() -> Arc<FailoverState> {
        let prober = ScriptedProber::healthy(&[A, B, C]);
        let set = TargetSet::build(&addresses(&[A, B, C]), &prober, client(), Duration::from_secs(1))
            .await
            .unwrap();
        Arc::new(FailoverState::new(set))
    }

    #[tokio::test]
    async fn test_starts_on_first_target() {
        let state = state().await;
        assert_eq!(state.active().await.to_string(), A);
        assert_eq!(state.snapshot().await.target().to_string(), A);
        assert_eq!(state.selection().await, Selection { active: 0, cursor: 0 });
    }

    #[tokio::test]
    async fn test_cursor_wraps() {
        let state = state().await;
        assert_eq!(state.advance_cursor().await, 1);
        assert_eq!(state.advance_cursor().await, 2);
        assert_eq!(state.advance_cursor().await, 0);
        // Advancing never moves the active target.
        assert_eq!(state.active().await.to_string(), A);
    }

    #[tokio::test]
    async fn test_switch_reports_previous() {
        let state = state().await;
        let previous = state.switch_to(2).await.unwrap();
        assert_eq!(previous.to_string(), A);
        assert_eq!(state.selection().await, Selection { active: 2, cursor: 2 });
        assert!(state.switch_to(2).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_readers_see_whole_targets() {
        let state = state().await;
        let valid: Vec<String> = state.targets().targets().map(|t| t.to_string()).collect();

        let mut readers = Vec::new();
        for _ in 0..16 {
            let state = state.clone();
            let valid = valid.clone();
            readers.push(tokio::spawn(async move {
                for _ in 0..500 {
                    let proxy = state.snapshot().await;
                    assert!(valid.contains(&proxy.target().to_string()));
                    let selection = state.selection().await;
                    assert!(selection.active < 3 && selection.cursor < 3);
                }
            }));
        }

        let writer = {
            let state = state.clone();
            tokio::spawn(async move {
                for i in 0..1500 {
                    state.advance_cursor().await;
                    state.switch_to(i).await;
                }
            })
        };

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
