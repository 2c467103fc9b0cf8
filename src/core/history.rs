//! Interaction log.
//!
//! Interactions are kept in a ring buffer so a long-lived page cannot grow
//! the log without bound. When full, the oldest record is evicted.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Default number of interaction records retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 500;

/// Interaction event types that are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Click,
    Input,
    Change,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Click => "click",
            InteractionKind::Input => "input",
            InteractionKind::Change => "change",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lightweight metadata about one user interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    /// Tag name of the event target, e.g. `BUTTON`
    pub tag: Option<String>,
    /// Epoch milliseconds
    pub time: i64,
}

/// Bounded, append-only interaction log.
#[derive(Debug, Clone)]
pub struct InteractionHistory {
    records: VecDeque<InteractionRecord>,
    capacity: usize,
    evicted: u64,
}

impl InteractionHistory {
    /// Create a log holding at most `capacity` records (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
            evicted: 0,
        }
    }

    /// Append a record, evicting the oldest if full.
    ///
    /// Returns the evicted record, if any.
    pub fn push(&mut self, record: InteractionRecord) -> Option<InteractionRecord> {
        let evicted = if self.records.len() == self.capacity {
            self.evicted += 1;
            self.records.pop_front()
        } else {
            None
        };
        self.records.push_back(record);
        evicted
    }

    /// Copy of the retained records, oldest first.
    pub fn to_vec(&self) -> Vec<InteractionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total records dropped to stay within capacity.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

impl Default for InteractionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(time: i64) -> InteractionRecord {
        InteractionRecord {
            kind: InteractionKind::Click,
            tag: Some("BUTTON".to_string()),
            time,
        }
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut history = InteractionHistory::new(3);
        for t in 0..5 {
            history.push(click(t));
        }

        let times: Vec<i64> = history.to_vec().iter().map(|r| r.time).collect();
        assert_eq!(times, vec![2, 3, 4]);
        assert_eq!(history.evicted(), 2);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_push_returns_evicted_record() {
        let mut history = InteractionHistory::new(1);
        assert!(history.push(click(1)).is_none());
        assert_eq!(history.push(click(2)).map(|r| r.time), Some(1));
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = InteractionHistory::new(0);
        history.push(click(1));
        history.push(click(2));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.to_vec(), vec![click(2)]);
    }

    #[test]
    fn test_record_json_shape() {
        let record = InteractionRecord {
            kind: InteractionKind::Input,
            tag: None,
            time: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "input");
        assert!(json["tag"].is_null());
        assert_eq!(json["time"], 1_700_000_000_000_i64);
    }
}
