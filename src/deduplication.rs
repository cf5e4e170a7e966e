use crate::types::Signal;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Most signals shown per scan cycle.
pub const MAX_NEW_SIGNALS: usize = 3;

/// Keeps candidates whose identity is not in `seen`, in input order, capped at
/// [`MAX_NEW_SIGNALS`]. Only the returned signals are added to the updated set;
/// truncated ones may come back as new on a later scan.
pub fn filter_new(candidates: &[Signal], seen: &HashSet<String>) -> (Vec<Signal>, HashSet<String>) {
    let mut updated = seen.clone();
    let mut fresh = Vec::new();

    for signal in candidates {
        if fresh.len() == MAX_NEW_SIGNALS {
            break;
        }
        if !seen.contains(&signal.identity()) {
            fresh.push(signal.clone());
        }
    }

    updated.extend(fresh.iter().map(Signal::identity));
    (fresh, updated)
}

/// Session-wide set of signal identities already shown. Never pruned.
pub struct SignalDeduplicator {
    seen: RwLock<HashSet<String>>,
}

impl SignalDeduplicator {
    pub fn new() -> Self {
        Self {
            seen: RwLock::new(HashSet::new()),
        }
    }

    pub async fn filter_new(&self, candidates: &[Signal]) -> Vec<Signal> {
        let mut seen = self.seen.write().await;
        let (fresh, updated) = filter_new(candidates, &seen);
        *seen = updated;
        fresh
    }

    pub async fn seen_count(&self) -> usize {
        self.seen.read().await.len()
    }
}

impl Default for SignalDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}
