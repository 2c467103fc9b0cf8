//! Core functionality for the collector.
//!
//! This module contains:
//! - Snapshot records and the aggregator that builds them
//! - The bounded interaction log
//! - Subscriber bookkeeping
//! - The state store tying them together

pub mod history;
pub mod snapshot;
pub mod store;
pub mod subscribers;

// Re-export commonly used types
pub use history::{InteractionHistory, InteractionKind, InteractionRecord, DEFAULT_HISTORY_CAPACITY};
pub use snapshot::{collect_snapshot, CollectError, Snapshot, SnapshotSection, Trigger, UnknownTrigger};
pub use store::StateStore;
pub use subscribers::{SubscriberFn, SubscriberList, Subscription};
