//! In-memory transparency log.
//!
//! Tracks what the collector has done during this session: how many
//! snapshots it took, how many interactions it logged, how many scroll
//! events were coalesced. Nothing here is written to disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Collection counters for the current session.
#[derive(Debug)]
pub struct TransparencyLog {
    /// Snapshots successfully collected
    snapshots_collected: AtomicU64,
    /// Collections aborted by a reader error
    collection_failures: AtomicU64,
    /// Interactions appended to the history
    interactions_recorded: AtomicU64,
    /// Interactions dropped from the history to respect its capacity
    interactions_evicted: AtomicU64,
    /// Raw scroll events received by the binder
    scroll_events: AtomicU64,
    /// Debounced scroll collections fired
    scroll_triggers: AtomicU64,
    /// Subscriber callbacks invoked
    notifications_delivered: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
}

impl TransparencyLog {
    pub fn new() -> Self {
        Self {
            snapshots_collected: AtomicU64::new(0),
            collection_failures: AtomicU64::new(0),
            interactions_recorded: AtomicU64::new(0),
            interactions_evicted: AtomicU64::new(0),
            scroll_events: AtomicU64::new(0),
            scroll_triggers: AtomicU64::new(0),
            notifications_delivered: AtomicU64::new(0),
            session_start: Utc::now(),
        }
    }

    /// Record a collected snapshot and the subscribers it reached.
    pub fn record_snapshot(&self, notified: usize) {
        self.snapshots_collected.fetch_add(1, Ordering::Relaxed);
        self.notifications_delivered
            .fetch_add(notified as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.collection_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an interaction, noting whether it pushed an older one out.
    pub fn record_interaction(&self, evicted: bool) {
        self.interactions_recorded.fetch_add(1, Ordering::Relaxed);
        if evicted {
            self.interactions_evicted.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_scroll_event(&self) {
        self.scroll_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scroll_trigger(&self) {
        self.scroll_triggers.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> TransparencyStats {
        TransparencyStats {
            snapshots_collected: self.snapshots_collected.load(Ordering::Relaxed),
            collection_failures: self.collection_failures.load(Ordering::Relaxed),
            interactions_recorded: self.interactions_recorded.load(Ordering::Relaxed),
            interactions_evicted: self.interactions_evicted.load(Ordering::Relaxed),
            scroll_events: self.scroll_events.load(Ordering::Relaxed),
            scroll_triggers: self.scroll_triggers.load(Ordering::Relaxed),
            notifications_delivered: self.notifications_delivered.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Snapshots collected: {}\n\
             - Collection failures: {}\n\
             - Interactions recorded: {} ({} evicted)\n\
             - Scroll events: {} ({} collections)\n\
             - Subscriber notifications: {}\n\
             - Session duration: {} seconds\n\
             \n\
             Data Handling:\n\
             - Snapshots are held in memory only\n\
             - Interactions record event type and target tag only\n\
             - No form values or keystrokes are read",
            stats.snapshots_collected,
            stats.collection_failures,
            stats.interactions_recorded,
            stats.interactions_evicted,
            stats.scroll_events,
            stats.scroll_triggers,
            stats.notifications_delivered,
            stats.session_duration_secs
        )
    }
}

impl Default for TransparencyLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of transparency statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransparencyStats {
    pub snapshots_collected: u64,
    pub collection_failures: u64,
    pub interactions_recorded: u64,
    pub interactions_evicted: u64,
    pub scroll_events: u64,
    pub scroll_triggers: u64,
    pub notifications_delivered: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Thread-safe shared transparency log.
pub type SharedTransparencyLog = Arc<TransparencyLog>;

/// Create a new shared transparency log.
pub fn create_shared_log() -> SharedTransparencyLog {
    Arc::new(TransparencyLog::new())
}
