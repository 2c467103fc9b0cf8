//! Client Data Collector - environment snapshots for browser-like hosts.
//!
//! This library gathers a structured snapshot of a page's environment
//! (navigator, document, location, screen, locale) whenever something
//! interesting happens, keeps the latest one, and hands each new snapshot to
//! subscribers.
//!
//! # Data Handling
//!
//! - **Read only**: Readers never modify host state
//! - **Memory only**: Snapshots and interaction records are never persisted
//! - **Tag names only**: Interactions record the element tag, never its content
//! - **Transparency**: Every collection is counted and can be summarized
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Client Data Collector                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │    Host     │──▶│   Readers   │──▶│  Snapshot   │       │
//! │  │  Provider   │   │ (5 sections)│   │ Aggregator  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │         ▲                                    │              │
//! │         │                                    ▼              │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Event     │──▶│  Collector  │──▶│ State Store │       │
//! │  │   Binder    │   │  (facade)   │   │ subscribers │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use client_data_collector::{Collector, StaticHost, Trigger};
//!
//! let host = Arc::new(StaticHost::default());
//! host.set_title("Home");
//!
//! let collector = Collector::with_defaults(host);
//! collector.on_update(|snapshot| println!("collected on {}", snapshot.trigger));
//!
//! let snapshot = collector.collect(Trigger::Load).unwrap();
//! assert_eq!(snapshot.tab_details.identity.title, "Home");
//! ```

pub mod binder;
pub mod collector;
pub mod config;
pub mod core;
pub mod host;
pub mod readers;
pub mod replay;
pub mod transparency;

// Re-export key types at crate root for convenience
pub use binder::{BinderError, EventBinder, HostEvent};
pub use collector::Collector;
pub use config::{Config, ConfigError};
pub use core::{
    CollectError, InteractionKind, InteractionRecord, Snapshot, Subscription, Trigger,
};
pub use host::{EnvironmentProvider, HostApi, HostError, HostFixture, StaticHost};
pub use replay::{ReplayError, ReplayScript};
pub use transparency::{SharedTransparencyLog, TransparencyLog, TransparencyStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Data collection declaration that can be displayed to users.
pub const DATA_DECLARATION: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║        CLIENT DATA COLLECTOR - DATA COLLECTION DECLARATION       ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  This collector reads page environment state on page events.     ║
║                                                                  ║
║  ✓ WHAT WE READ:                                                 ║
║    • Browser and device capabilities (navigator)                 ║
║    • Tab state and the document title                            ║
║    • The page URL, its query parameters and the referrer         ║
║    • Screen, viewport and display preferences                    ║
║    • Current time, time zone and locale                          ║
║    • Which kind of element was clicked or edited (tag only)      ║
║                                                                  ║
║  ✗ WHAT WE NEVER READ:                                           ║
║    • What you type into inputs                                   ║
║    • Page content or element text                                ║
║    • Cookies, storage or credentials                             ║
║    • Cursor position                                             ║
║                                                                  ║
║  Snapshots are kept in memory only and replaced on each event.   ║
║  The interaction log is bounded and evicts its oldest entries.   ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;
