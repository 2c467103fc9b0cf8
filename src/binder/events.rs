//! Host events the binder listens for.

use crate::core::{InteractionKind, Trigger};
use serde::{Deserialize, Serialize};

/// An event raised by the host window or document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostEvent {
    /// window `load`
    Load,
    /// document `click` (capture phase)
    Click {
        #[serde(default)]
        tag: Option<String>,
    },
    /// document `input` (capture phase)
    Input {
        #[serde(default)]
        tag: Option<String>,
    },
    /// document `change` (capture phase)
    Change {
        #[serde(default)]
        tag: Option<String>,
    },
    /// window `scroll`
    Scroll,
    /// document `visibilitychange`
    #[serde(rename = "visibilitychange")]
    VisibilityChange,
}

impl HostEvent {
    pub fn click(tag: &str) -> Self {
        HostEvent::Click {
            tag: Some(tag.to_string()),
        }
    }

    /// Interaction kind and target tag, for events that are logged.
    pub fn interaction(&self) -> Option<(InteractionKind, Option<&str>)> {
        match self {
            HostEvent::Click { tag } => Some((InteractionKind::Click, tag.as_deref())),
            HostEvent::Input { tag } => Some((InteractionKind::Input, tag.as_deref())),
            HostEvent::Change { tag } => Some((InteractionKind::Change, tag.as_deref())),
            _ => None,
        }
    }

    /// The trigger label a collection for this event carries.
    pub fn trigger(&self) -> Trigger {
        match self {
            HostEvent::Load => Trigger::Load,
            HostEvent::Click { .. } => Trigger::Click,
            HostEvent::Input { .. } => Trigger::Input,
            HostEvent::Change { .. } => Trigger::Change,
            HostEvent::Scroll => Trigger::Scroll,
            HostEvent::VisibilityChange => Trigger::VisibilityChange,
        }
    }
}
