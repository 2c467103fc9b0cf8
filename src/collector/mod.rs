//! The collector facade.
//!
//! A [`Collector`] owns everything one page's worth of collection needs:
//! the host it reads from, the state store, its configuration and its
//! transparency counters. Several collectors can run side by side.

use crate::config::Config;
use crate::core::{
    collect_snapshot, CollectError, InteractionKind, InteractionRecord, Snapshot, StateStore,
    Subscription, Trigger,
};
use crate::host::EnvironmentProvider;
use crate::transparency::{create_shared_log, SharedTransparencyLog, TransparencyStats};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, ThreadId};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Snapshot collector bound to one host.
pub struct Collector {
    host: Arc<dyn EnvironmentProvider>,
    store: StateStore,
    log: SharedTransparencyLog,
    config: Config,
    instance_id: Uuid,
    binder_attached: AtomicBool,
    /// Held from reading the host until the last subscriber returns, so
    /// store order and notification order agree across threads.
    collecting: Mutex<()>,
    collecting_on: Mutex<Option<ThreadId>>,
}

/// One thread's turn at collecting. Clears the owner before the turn lock
/// is released.
struct CollectTurn<'a> {
    _turn: MutexGuard<'a, ()>,
    owner: &'a Mutex<Option<ThreadId>>,
}

impl Drop for CollectTurn<'_> {
    fn drop(&mut self) {
        *self.owner.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl Collector {
    pub fn new(host: Arc<dyn EnvironmentProvider>, config: Config) -> Self {
        Self {
            host,
            store: StateStore::new(config.history_capacity),
            log: create_shared_log(),
            config,
            instance_id: Uuid::new_v4(),
            binder_attached: AtomicBool::new(false),
            collecting: Mutex::new(()),
            collecting_on: Mutex::new(None),
        }
    }

    /// Collector with the default configuration.
    pub fn with_defaults(host: Arc<dyn EnvironmentProvider>) -> Self {
        Self::new(host, Config::default())
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &Arc<dyn EnvironmentProvider> {
        &self.host
    }

    /// Collect a snapshot labelled with `trigger`.
    ///
    /// On success the snapshot becomes the latest and every subscriber is
    /// called with it, in subscription order, before this returns. On error
    /// the previous snapshot stays in place and nobody is notified.
    ///
    /// Collections from different threads run one at a time. A subscriber
    /// that collects from inside its callback runs nested in the current
    /// turn instead of waiting for it.
    pub fn collect(&self, trigger: Trigger) -> Result<Arc<Snapshot>, CollectError> {
        let _turn = self.begin_collect();

        let snapshot = match collect_snapshot(self.host.as_ref(), trigger) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(collector = %self.instance_id, %trigger, error = %e, "Collection failed");
                self.log.record_failure();
                return Err(e);
            }
        };

        let (snapshot, notified) = self.store.publish(snapshot);
        self.log.record_snapshot(notified);
        self.log_snapshot(&snapshot, notified);

        Ok(snapshot)
    }

    /// Force a fresh snapshot, labelled `updatedData`.
    pub fn get_data(&self) -> Result<Arc<Snapshot>, CollectError> {
        self.collect(Trigger::UpdatedData)
    }

    /// The most recent snapshot, if any has been collected.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.store.latest()
    }

    /// `collectedAt` of the most recent snapshot.
    pub fn latest_timestamp(&self) -> Option<i64> {
        self.store.latest_timestamp()
    }

    /// Call `f` with every snapshot collected from now on.
    pub fn on_update<F>(&self, f: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.store.subscribe(f)
    }

    pub fn subscriber_count(&self) -> usize {
        self.store.subscriber_count()
    }

    /// Copy of the interaction log, oldest first.
    pub fn history(&self) -> Vec<InteractionRecord> {
        self.store.history()
    }

    /// Append an interaction to the log, stamped with host time.
    pub fn record_interaction(&self, kind: InteractionKind, tag: Option<String>) -> InteractionRecord {
        let record = InteractionRecord {
            kind,
            tag,
            time: self.host.now().timestamp_millis(),
        };
        let evicted = self.store.record(record.clone());
        self.log.record_interaction(evicted);
        record
    }

    pub fn stats(&self) -> TransparencyStats {
        self.log.stats()
    }

    pub fn transparency_log(&self) -> &SharedTransparencyLog {
        &self.log
    }

    /// Claim the single event binder slot. Returns false if already taken.
    pub(crate) fn claim_binder(&self) -> bool {
        self.binder_attached
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn release_binder(&self) {
        self.binder_attached.store(false, Ordering::SeqCst);
    }

    fn begin_collect(&self) -> Option<CollectTurn<'_>> {
        let me = thread::current().id();
        if *self.collecting_on.lock().unwrap_or_else(|e| e.into_inner()) == Some(me) {
            return None;
        }

        let turn = self.collecting.lock().unwrap_or_else(|e| e.into_inner());
        *self.collecting_on.lock().unwrap_or_else(|e| e.into_inner()) = Some(me);
        Some(CollectTurn {
            _turn: turn,
            owner: &self.collecting_on,
        })
    }

    fn log_snapshot(&self, snapshot: &Snapshot, notified: usize) {
        if !self.config.log_snapshots {
            debug!(
                collector = %self.instance_id,
                trigger = %snapshot.trigger,
                collected_at = snapshot.collected_at,
                notified,
                "Snapshot collected"
            );
            return;
        }

        match serde_json::to_string(snapshot) {
            Ok(json) => info!(
                collector = %self.instance_id,
                trigger = %snapshot.trigger,
                notified,
                snapshot = %json,
                "Snapshot collected"
            ),
            Err(e) => warn!(error = %e, "Could not serialize snapshot for logging"),
        }
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("instance_id", &self.instance_id)
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}
