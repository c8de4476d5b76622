use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

use crate::models::{ThresholdConfig, ThresholdSnapshot, ThresholdSource};

/// Holds the active threshold snapshot.
///
/// Snapshots are immutable; [`apply`](Self::apply) publishes a new one with
/// the next version. Readers holding an older `Arc` keep a consistent view.
#[derive(Debug)]
pub struct ThresholdStore {
    sender: watch::Sender<Arc<ThresholdSnapshot>>,
}

impl ThresholdStore {
    pub fn new(initial: ThresholdSnapshot) -> Self {
        let (sender, _receiver) = watch::channel(Arc::new(initial));
        Self { sender }
    }

    /// The active snapshot
    pub fn current(&self) -> Arc<ThresholdSnapshot> {
        self.sender.borrow().clone()
    }

    /// Publish new thresholds and return the resulting snapshot
    pub fn apply(
        &self,
        thresholds: ThresholdConfig,
        source: ThresholdSource,
    ) -> Arc<ThresholdSnapshot> {
        let mut applied = self.current();
        self.sender.send_modify(|current| {
            let next = Arc::new(ThresholdSnapshot {
                version: current.version + 1,
                thresholds,
                source,
                computed_at: Utc::now(),
            });
            applied = next.clone();
            *current = next;
        });
        applied
    }

    /// Watch for snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<Arc<ThresholdSnapshot>> {
        self.sender.subscribe()
    }
}

impl Default for ThresholdStore {
    fn default() -> Self {
        Self::new(ThresholdSnapshot::initial())
    }
}
