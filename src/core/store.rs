//! State store: latest snapshot, interaction log and subscribers.

use crate::core::history::{InteractionHistory, InteractionRecord};
use crate::core::snapshot::Snapshot;
use crate::core::subscribers::{self, SharedSubscribers, SubscriberFn, SubscriberList, Subscription};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct StoreState {
    latest: Option<Arc<Snapshot>>,
    latest_timestamp: Option<i64>,
    history: InteractionHistory,
}

/// Holds collector state for one collector instance.
#[derive(Debug)]
pub struct StateStore {
    state: Mutex<StoreState>,
    subscribers: SharedSubscribers,
}

impl StateStore {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            state: Mutex::new(StoreState {
                latest: None,
                latest_timestamp: None,
                history: InteractionHistory::new(history_capacity),
            }),
            subscribers: Arc::new(Mutex::new(SubscriberList::new())),
        }
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the latest snapshot and notify subscribers in order.
    ///
    /// Subscribers run after the state lock is released, so they may read
    /// from or collect through the same store. Returns the stored snapshot
    /// and the number of subscribers notified.
    pub fn publish(&self, snapshot: Snapshot) -> (Arc<Snapshot>, usize) {
        let snapshot = Arc::new(snapshot);
        {
            let mut state = self.state();
            state.latest_timestamp = Some(snapshot.collected_at);
            state.latest = Some(snapshot.clone());
        }

        let callbacks = subscribers::lock(&self.subscribers).callbacks();
        for callback in &callbacks {
            callback(&snapshot);
        }

        (snapshot, callbacks.len())
    }

    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.state().latest.clone()
    }

    pub fn latest_timestamp(&self) -> Option<i64> {
        self.state().latest_timestamp
    }

    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let callback: SubscriberFn = Arc::new(f);
        let id = subscribers::lock(&self.subscribers).add(callback);
        Subscription::new(id, &self.subscribers)
    }

    pub fn subscriber_count(&self) -> usize {
        subscribers::lock(&self.subscribers).len()
    }

    /// Append to the interaction log. Returns true if a record was evicted.
    pub fn record(&self, record: InteractionRecord) -> bool {
        self.state().history.push(record).is_some()
    }

    /// Copy of the interaction log, oldest first.
    pub fn history(&self) -> Vec<InteractionRecord> {
        self.state().history.to_vec()
    }

    pub fn history_evicted(&self) -> u64 {
        self.state().history.evicted()
    }
}
