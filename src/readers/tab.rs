//! `tabDetails`: document visibility, lifecycle and identity.

use crate::host::{EnvironmentProvider, HostError, ReadyState, VisibilityState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabState {
    pub visibility_state: VisibilityState,
    pub hidden: bool,
    pub has_focus: bool,
    pub ready_state: ReadyState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabLifecycle {
    pub was_discarded: bool,
    pub prerendering: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabUi {
    pub fullscreen: bool,
    pub pointer_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabIdentity {
    pub title: String,
}

/// Document state for the current tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDetails {
    pub state: TabState,
    pub lifecycle: TabLifecycle,
    pub ui: TabUi,
    pub identity: TabIdentity,
}

pub fn tab_details(host: &dyn EnvironmentProvider) -> Result<TabDetails, HostError> {
    let doc = host.document()?;

    Ok(TabDetails {
        state: TabState {
            visibility_state: doc.visibility_state,
            hidden: doc.visibility_state != VisibilityState::Visible,
            has_focus: doc.has_focus,
            ready_state: doc.ready_state,
        },
        lifecycle: TabLifecycle {
            was_discarded: doc.was_discarded.unwrap_or(false),
            prerendering: doc.prerendering.unwrap_or(false),
        },
        ui: TabUi {
            fullscreen: doc.fullscreen_element.is_some(),
            pointer_locked: doc.pointer_lock_element.is_some(),
        },
        identity: TabIdentity { title: doc.title },
    })
}
