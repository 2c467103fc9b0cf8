//! Snapshot subscribers.

use crate::core::snapshot::Snapshot;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Callback invoked with every new snapshot.
pub type SubscriberFn = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Subscribers in subscription order.
#[derive(Default)]
pub struct SubscriberList {
    next_id: u64,
    entries: Vec<(u64, SubscriberFn)>,
}

impl SubscriberList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber and return its id.
    pub fn add(&mut self, f: SubscriberFn) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, f));
        id
    }

    /// Remove a subscriber by id. Returns false if it was already gone.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// The current subscribers, in order, detached from the list.
    pub fn callbacks(&self) -> Vec<SubscriberFn> {
        self.entries.iter().map(|(_, f)| f.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for SubscriberList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberList")
            .field("len", &self.entries.len())
            .finish()
    }
}

pub(crate) type SharedSubscribers = Arc<Mutex<SubscriberList>>;

pub(crate) fn lock(list: &Mutex<SubscriberList>) -> MutexGuard<'_, SubscriberList> {
    list.lock().unwrap_or_else(|e| e.into_inner())
}

/// Handle returned by a subscription.
///
/// Dropping the handle does not unsubscribe; call
/// [`Subscription::unsubscribe`].
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    list: Weak<Mutex<SubscriberList>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, list: &SharedSubscribers) -> Self {
        Self {
            id,
            list: Arc::downgrade(list),
        }
    }

    /// Stop receiving snapshots.
    ///
    /// Safe to call more than once; returns true only on the call that
    /// actually removed the subscriber.
    pub fn unsubscribe(&self) -> bool {
        match self.list.upgrade() {
            Some(list) => lock(&list).remove(self.id),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.list
            .upgrade()
            .map(|list| lock(&list).entries.iter().any(|(id, _)| *id == self.id))
            .unwrap_or(false)
    }
}
