//! Replay of recorded host event scripts.
//!
//! A script is JSON Lines, one step per line:
//!
//! ```text
//! {"at_ms": 0, "event": {"type": "load"}, "host": {"title": "Home"}}
//! {"at_ms": 120, "event": {"type": "click", "tag": "BUTTON"}}
//! # comments and blank lines are skipped
//! {"at_ms": 400, "event": {"type": "scroll"}}
//! ```

use crate::binder::{BinderError, EventBinder, HostEvent};
use crate::host::{StaticHost, VisibilityState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Extra wait after the last step, on top of the debounce delay.
const SETTLE_MARGIN: Duration = Duration::from_millis(50);

/// Changes applied to the host just before a step's event is dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub visibility: Option<VisibilityState>,
    #[serde(default)]
    pub focused: Option<bool>,
}

impl HostUpdate {
    fn apply(&self, host: &StaticHost) {
        if let Some(title) = &self.title {
            host.set_title(title);
        }
        if let Some(visibility) = self.visibility {
            host.set_visibility(visibility);
        }
        if let Some(focused) = self.focused {
            host.set_focus(focused);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStep {
    /// Offset from the start of the replay, in milliseconds
    pub at_ms: u64,
    pub event: HostEvent,
    #[serde(default)]
    pub host: Option<HostUpdate>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: at_ms {at_ms} is earlier than the previous step ({previous})")]
    OutOfOrder { line: usize, at_ms: u64, previous: u64 },
    #[error(transparent)]
    Binder(#[from] BinderError),
}

/// An ordered list of replay steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayScript {
    steps: Vec<ReplayStep>,
}

impl ReplayScript {
    pub fn parse(input: &str) -> Result<Self, ReplayError> {
        let mut steps: Vec<ReplayStep> = Vec::new();

        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let step: ReplayStep = serde_json::from_str(trimmed).map_err(|source| {
                ReplayError::Parse {
                    line: line_no,
                    source,
                }
            })?;

            if let Some(previous) = steps.last() {
                if step.at_ms < previous.at_ms {
                    return Err(ReplayError::OutOfOrder {
                        line: line_no,
                        at_ms: step.at_ms,
                        previous: previous.at_ms,
                    });
                }
            }
            steps.push(step);
        }

        Ok(Self { steps })
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn steps(&self) -> &[ReplayStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Offset of the last step.
    pub fn duration(&self) -> Duration {
        self.steps
            .last()
            .map(|s| Duration::from_millis(s.at_ms))
            .unwrap_or_default()
    }

    /// Play the script through `binder` in real time.
    ///
    /// After the last step, waits `settle` and then for the binder to drain
    /// its queue, so a trailing debounced scroll has fired before this
    /// returns. Use [`ReplayScript::settle_for`] to derive `settle` from the
    /// debounce delay.
    pub fn run(
        &self,
        host: &StaticHost,
        binder: &EventBinder,
        settle: Duration,
    ) -> Result<(), ReplayError> {
        let start = Instant::now();

        for step in &self.steps {
            let due = start + Duration::from_millis(step.at_ms);
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }

            if let Some(update) = &step.host {
                update.apply(host);
            }
            debug!(at_ms = step.at_ms, event = ?step.event, "Replaying event");
            binder.dispatch(step.event.clone())?;
        }

        thread::sleep(settle);
        binder.sync(settle + Duration::from_secs(5))?;
        Ok(())
    }

    /// Settle time for a binder with the given scroll debounce delay.
    pub fn settle_for(scroll_debounce: Duration) -> Duration {
        scroll_debounce + SETTLE_MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let script = ReplayScript::parse(
            r#"
# warm up
{"at_ms": 0, "event": {"type": "load"}, "host": {"title": "Home"}}

{"at_ms": 10, "event": {"type": "click", "tag": "A"}}
"#,
        )
        .unwrap();

        assert_eq!(script.len(), 2);
        assert_eq!(script.steps()[0].event, HostEvent::Load);
        assert_eq!(
            script.steps()[0].host.as_ref().and_then(|h| h.title.as_deref()),
            Some("Home")
        );
        assert_eq!(script.steps()[1].event, HostEvent::click("A"));
        assert!(script.steps()[1].host.is_none());
        assert_eq!(script.duration(), Duration::from_millis(10));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = ReplayScript::parse("{\"at_ms\": 0, \"event\": {\"type\": \"load\"}}\n{oops}")
            .unwrap_err();
        assert!(matches!(err, ReplayError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_decreasing_offset_rejected() {
        let err = ReplayScript::parse(
            "{\"at_ms\": 100, \"event\": {\"type\": \"scroll\"}}\n\
             {\"at_ms\": 50, \"event\": {\"type\": \"scroll\"}}",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReplayError::OutOfOrder {
                line: 2,
                at_ms: 50,
                previous: 100
            }
        ));
    }

    #[test]
    fn test_host_update_applies_fields() {
        let host = StaticHost::default();
        let update = HostUpdate {
            title: Some("Checkout".to_string()),
            visibility: Some(VisibilityState::Hidden),
            focused: Some(false),
        };
        update.apply(&host);

        let document = host.fixture().document;
        assert_eq!(document.title, "Checkout");
        assert_eq!(document.visibility_state, VisibilityState::Hidden);
        assert!(!document.has_focus);
    }

    #[test]
    fn test_empty_script() {
        let script = ReplayScript::parse("").unwrap();
        assert!(script.is_empty());
        assert_eq!(script.duration(), Duration::ZERO);
    }
}
