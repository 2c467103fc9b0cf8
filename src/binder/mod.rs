//! Event binder.
//!
//! Connects host events to collection. Events are queued onto a channel and
//! handled on a dedicated thread, one at a time:
//!
//! - `load` and `visibilitychange` collect immediately
//! - `click`, `input` and `change` log the interaction, then collect
//! - `scroll` collects once the configured quiet period has passed since the
//!   last scroll event
//!
//! Collection failures do not reach the event source. They are logged and
//! counted in the collector's transparency log. A panicking subscriber is
//! counted the same way and the binder keeps running.

pub mod debounce;
pub mod events;

pub use debounce::Debounce;
pub use events::HostEvent;

use crate::collector::Collector;
use crate::core::Trigger;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Errors from attaching to or dispatching through a binder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BinderError {
    #[error("host is not a browser environment")]
    NotBrowser,
    #[error("an event binder is already attached to this collector")]
    AlreadyAttached,
    #[error("event binder is detached")]
    Detached,
    #[error("event binder did not respond within {0:?}")]
    Timeout(Duration),
}

/// Owned by the binder thread. Frees the collector's binder slot however
/// the thread ends.
struct BinderSlot {
    collector: Arc<Collector>,
    running: Arc<AtomicBool>,
}

impl Drop for BinderSlot {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.collector.release_binder();
        info!(collector = %self.collector.instance_id(), "Event binder detached");
    }
}

enum BinderMessage {
    Event(HostEvent),
    Sync(Sender<()>),
    Detach,
}

/// Routes host events into a [`Collector`].
pub struct EventBinder {
    sender: Sender<BinderMessage>,
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl EventBinder {
    /// Attach to a collector.
    ///
    /// Fails if the host is not browser-like or the collector already has a
    /// binder.
    pub fn attach(collector: Arc<Collector>) -> Result<Self, BinderError> {
        if !collector.host().is_browser() {
            info!("Host is not browser-like, event binder not attached");
            return Err(BinderError::NotBrowser);
        }
        if !collector.claim_binder() {
            return Err(BinderError::AlreadyAttached);
        }

        let (sender, receiver) = unbounded();
        let running = Arc::new(AtomicBool::new(true));

        let delay = collector.config().scroll_debounce;
        info!(
            collector = %collector.instance_id(),
            scroll_debounce_ms = delay.as_millis() as u64,
            "Event binder attached"
        );

        let slot = BinderSlot {
            collector,
            running: running.clone(),
        };
        let handle = thread::spawn(move || {
            let slot = slot;
            run_event_loop(&slot.collector, receiver, delay);
        });

        Ok(Self {
            sender,
            handle: Some(handle),
            running,
        })
    }

    /// Queue a host event. Returns immediately; collection happens on the
    /// binder thread.
    pub fn dispatch(&self, event: HostEvent) -> Result<(), BinderError> {
        if !self.is_attached() {
            return Err(BinderError::Detached);
        }
        self.sender
            .send(BinderMessage::Event(event))
            .map_err(|_| BinderError::Detached)
    }

    /// Wait until every event dispatched so far has been handled.
    ///
    /// A debounced scroll that is still waiting out its quiet period is not
    /// forced.
    pub fn sync(&self, timeout: Duration) -> Result<(), BinderError> {
        if !self.is_attached() {
            return Err(BinderError::Detached);
        }
        let (ack_tx, ack_rx) = bounded(1);
        self.sender
            .send(BinderMessage::Sync(ack_tx))
            .map_err(|_| BinderError::Detached)?;
        ack_rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => BinderError::Timeout(timeout),
            RecvTimeoutError::Disconnected => BinderError::Detached,
        })
    }

    pub fn is_attached(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop handling events. Events already queued are handled first; a
    /// pending scroll collection is dropped.
    pub fn detach(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.sender.send(BinderMessage::Detach);
            let _ = handle.join();
        }
    }
}

impl Drop for EventBinder {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for EventBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBinder")
            .field("attached", &self.is_attached())
            .finish()
    }
}

fn run_event_loop(collector: &Collector, receiver: Receiver<BinderMessage>, delay: Duration) {
    let mut scroll = Debounce::new(delay);

    loop {
        let message = match scroll.deadline() {
            Some(deadline) => receiver.recv_deadline(deadline),
            None => receiver
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        };

        // A deadline that has passed fires before the next event can reset it.
        if scroll.fire_if_due(Instant::now()) {
            collector.transparency_log().record_scroll_trigger();
            contained(collector, Trigger::Scroll, || trigger(collector, Trigger::Scroll));
        }

        match message {
            Ok(BinderMessage::Event(event)) => {
                let label = event.trigger();
                contained(collector, label, || handle_event(collector, &mut scroll, event));
            }
            Ok(BinderMessage::Sync(ack)) => {
                let _ = ack.send(());
            }
            Ok(BinderMessage::Detach) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    if scroll.cancel() {
        debug!("Dropped pending scroll collection");
    }
}

fn handle_event(collector: &Collector, scroll: &mut Debounce, event: HostEvent) {
    match &event {
        HostEvent::Scroll => {
            collector.transparency_log().record_scroll_event();
            if scroll.schedule(Instant::now()) {
                debug!("Scroll debounce reset");
            }
        }
        HostEvent::Click { .. } | HostEvent::Input { .. } | HostEvent::Change { .. } => {
            if let Some((kind, tag)) = event.interaction() {
                collector.record_interaction(kind, tag.map(str::to_string));
            }
            trigger(collector, event.trigger());
        }
        HostEvent::Load | HostEvent::VisibilityChange => trigger(collector, event.trigger()),
    }
}

/// Run one event's handling, counting a panic as a failed collection.
fn contained<F: FnOnce()>(collector: &Collector, trigger: Trigger, f: F) {
    if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
        collector.transparency_log().record_failure();
        warn!(
            collector = %collector.instance_id(),
            %trigger,
            "Event handling panicked, binder continues"
        );
    }
}

fn trigger(collector: &Collector, trigger: Trigger) {
    if let Err(e) = collector.collect(trigger) {
        warn!(
            collector = %collector.instance_id(),
            %trigger,
            error = %e,
            "Triggered collection failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::InteractionKind;
    use crate::host::{HostApi, StaticHost};
    use std::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(5);

    fn attached(config: Config) -> (Arc<StaticHost>, Arc<Collector>, EventBinder) {
        let host = Arc::new(StaticHost::default());
        let collector = Arc::new(Collector::new(host.clone(), config));
        let binder = EventBinder::attach(collector.clone()).unwrap();
        (host, collector, binder)
    }

    #[test]
    fn test_not_browser_is_rejected() {
        let host = Arc::new(StaticHost::default());
        host.update(|h| h.browser = false);
        let collector = Arc::new(Collector::with_defaults(host));

        assert_eq!(
            EventBinder::attach(collector).unwrap_err(),
            BinderError::NotBrowser
        );
    }

    #[test]
    fn test_attaches_once_per_collector() {
        let (_, collector, mut binder) = attached(Config::default());
        assert_eq!(
            EventBinder::attach(collector.clone()).unwrap_err(),
            BinderError::AlreadyAttached
        );

        binder.detach();
        assert!(EventBinder::attach(collector).is_ok());
    }

    #[test]
    fn test_interaction_is_logged_before_collection() {
        let (_, collector, binder) = attached(Config::default());
        let history_len_at_notify = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&collector);
        let seen = history_len_at_notify.clone();
        collector.on_update(move |_| {
            if let Some(c) = weak.upgrade() {
                seen.lock().unwrap().push(c.history().len());
            }
        });

        binder.dispatch(HostEvent::click("BUTTON")).unwrap();
        binder
            .dispatch(HostEvent::Input {
                tag: Some("INPUT".to_string()),
            })
            .unwrap();
        binder.sync(WAIT).unwrap();

        assert_eq!(*history_len_at_notify.lock().unwrap(), vec![1, 2]);
        let history = collector.history();
        assert_eq!(history[0].kind, InteractionKind::Click);
        assert_eq!(history[0].tag.as_deref(), Some("BUTTON"));
        assert_eq!(collector.latest().unwrap().trigger, Trigger::Input);
    }

    #[test]
    fn test_load_and_visibility_collect() {
        let (host, collector, binder) = attached(Config::default());
        host.set_title("Home");

        binder.dispatch(HostEvent::Load).unwrap();
        binder.sync(WAIT).unwrap();
        let latest = collector.latest().unwrap();
        assert_eq!(latest.trigger, Trigger::Load);
        assert_eq!(latest.tab_details.identity.title, "Home");

        binder.dispatch(HostEvent::VisibilityChange).unwrap();
        binder.sync(WAIT).unwrap();
        assert_eq!(collector.latest().unwrap().trigger, Trigger::VisibilityChange);
        assert!(collector.history().is_empty());
    }

    #[test]
    fn test_failures_are_counted_not_raised() {
        let (host, collector, binder) = attached(Config::default());
        host.fail(HostApi::Screen);

        binder.dispatch(HostEvent::Load).unwrap();
        binder.sync(WAIT).unwrap();

        assert!(collector.latest().is_none());
        assert_eq!(collector.stats().collection_failures, 1);
        assert!(binder.is_attached());
    }

    #[test]
    fn test_panicking_subscriber_does_not_stop_binder() {
        let (_, collector, binder) = attached(Config::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        collector.on_update(move |snap| {
            if snap.trigger == Trigger::Click {
                panic!("subscriber failure");
            }
            s.lock().unwrap().push(snap.trigger);
        });

        binder.dispatch(HostEvent::click("BUTTON")).unwrap();
        binder.dispatch(HostEvent::Load).unwrap();
        binder.sync(WAIT).unwrap();

        assert!(binder.is_attached());
        assert_eq!(*seen.lock().unwrap(), vec![Trigger::Load]);
        assert_eq!(collector.latest().unwrap().trigger, Trigger::Load);
        assert_eq!(collector.stats().collection_failures, 1);
        assert_eq!(collector.history().len(), 1);
    }

    #[test]
    fn test_slot_released_when_thread_ends() {
        let (_, collector, binder) = attached(Config::default());

        // As if the thread had ended without an orderly detach.
        drop(BinderSlot {
            collector: collector.clone(),
            running: binder.running.clone(),
        });

        assert!(!binder.is_attached());
        assert_eq!(binder.dispatch(HostEvent::Load), Err(BinderError::Detached));
        assert!(collector.claim_binder());
    }

    #[test]
    fn test_detach_drops_pending_scroll() {
        let config = Config {
            scroll_debounce: Duration::from_secs(60),
            ..Config::default()
        };
        let (_, collector, mut binder) = attached(config);

        binder.dispatch(HostEvent::Scroll).unwrap();
        binder.sync(WAIT).unwrap();
        binder.detach();

        assert!(!binder.is_attached());
        assert!(collector.latest().is_none());
        assert_eq!(collector.stats().scroll_events, 1);
        assert_eq!(binder.dispatch(HostEvent::Load), Err(BinderError::Detached));
    }
}
