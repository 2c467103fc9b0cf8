//! Transparency module for the collector.
//!
//! This module tracks what the collector reads and how often, so a host
//! page can show users exactly what was gathered during a session.

pub mod log;

// Re-export commonly used types
pub use log::{create_shared_log, SharedTransparencyLog, TransparencyLog, TransparencyStats};
