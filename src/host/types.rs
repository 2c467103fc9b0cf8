//! Raw host values as a browser-like environment reports them.
//!
//! These mirror the shape of the host globals (`navigator`, `document`,
//! `location`, `screen`, `window`, `Intl`). Anything a host may omit is an
//! `Option`; the field readers decide how a missing value is coalesced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The host APIs a provider exposes.
///
/// Used to name the source of a [`HostError`] and to inject failures into
/// test hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HostApi {
    Navigator,
    Document,
    Location,
    Screen,
    Viewport,
    Orientation,
    MatchMedia,
    Intl,
}

impl fmt::Display for HostApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostApi::Navigator => "navigator",
            HostApi::Document => "document",
            HostApi::Location => "location",
            HostApi::Screen => "screen",
            HostApi::Viewport => "window",
            HostApi::Orientation => "screen.orientation",
            HostApi::MatchMedia => "matchMedia",
            HostApi::Intl => "Intl",
        };
        f.write_str(name)
    }
}

/// Errors raised by a host while reading its state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("host API `{0}` is unavailable")]
    Unavailable(HostApi),
    #[error("host API `{api}` failed: {message}")]
    Failed { api: HostApi, message: String },
}

impl HostError {
    /// The host API that produced this error.
    pub fn api(&self) -> HostApi {
        match self {
            HostError::Unavailable(api) => *api,
            HostError::Failed { api, .. } => *api,
        }
    }
}

/// `navigator.connection` (Network Information API).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkConnection {
    pub effective_type: Option<String>,
    pub downlink: Option<f64>,
    pub rtt: Option<u32>,
    pub save_data: Option<bool>,
}

/// `navigator.userActivation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserActivation {
    pub has_been_active: bool,
    pub is_active: bool,
}

/// One entry of `navigator.userAgentData.brands`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub brand: String,
    pub version: String,
}

/// `navigator.userAgentData` (User-Agent Client Hints).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserAgentData {
    pub brands: Vec<Brand>,
    pub mobile: Option<bool>,
    pub platform: Option<String>,
}

/// `navigator.virtualKeyboard`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualKeyboard {
    pub overlays_content: Option<bool>,
}

/// The `navigator` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigatorInfo {
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub languages: Option<Vec<String>>,
    pub device_memory: Option<f64>,
    pub hardware_concurrency: Option<u32>,
    pub vendor: Option<String>,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub max_touch_points: Option<u32>,
    pub on_line: Option<bool>,
    pub cookie_enabled: Option<bool>,
    pub do_not_track: Option<String>,
    pub pdf_viewer_enabled: Option<bool>,
    pub webdriver: Option<bool>,
    pub connection: Option<NetworkConnection>,
    pub mime_types: Option<Vec<String>>,
    pub plugins: Option<Vec<String>>,
    pub product: Option<String>,
    pub product_sub: Option<String>,
    pub user_activation: Option<UserActivation>,
    pub user_agent_data: Option<UserAgentData>,
    pub virtual_keyboard: Option<VirtualKeyboard>,
}

/// `document.visibilityState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
    Prerender,
}

/// `document.readyState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    #[default]
    Complete,
}

/// The `document` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentInfo {
    pub title: String,
    pub visibility_state: VisibilityState,
    pub has_focus: bool,
    pub ready_state: ReadyState,
    pub was_discarded: Option<bool>,
    pub prerendering: Option<bool>,
    /// Tag name of `document.fullscreenElement`, if any
    pub fullscreen_element: Option<String>,
    /// Tag name of `document.pointerLockElement`, if any
    pub pointer_lock_element: Option<String>,
    pub referrer: Option<String>,
}

/// The `window.location` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationInfo {
    pub href: String,
    pub protocol: String,
    pub origin: String,
    pub host: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
    pub search: String,
    pub hash: String,
    pub password: String,
}

impl Default for LocationInfo {
    fn default() -> Self {
        Self {
            href: "about:blank".to_string(),
            protocol: "about:".to_string(),
            origin: "null".to_string(),
            host: String::new(),
            hostname: String::new(),
            port: String::new(),
            pathname: "blank".to_string(),
            search: String::new(),
            hash: String::new(),
            password: String::new(),
        }
    }
}

/// The `window.screen` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenInfo {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub avail_width: Option<u32>,
    pub avail_height: Option<u32>,
    pub color_depth: Option<u32>,
    pub pixel_depth: Option<u32>,
}

/// Window geometry and density.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportInfo {
    pub inner_width: Option<u32>,
    pub inner_height: Option<u32>,
    pub outer_width: Option<u32>,
    pub outer_height: Option<u32>,
    pub device_pixel_ratio: Option<f64>,
}

/// `screen.orientation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenOrientation {
    #[serde(rename = "type")]
    pub orientation_type: String,
    pub angle: u16,
}

/// Resolved `Intl.DateTimeFormat` / `Intl.NumberFormat` options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntlInfo {
    pub time_zone: Option<String>,
    pub calendar: Option<String>,
    pub numbering_system: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_names_api() {
        let err = HostError::Unavailable(HostApi::Orientation);
        assert_eq!(err.api(), HostApi::Orientation);
        assert_eq!(err.to_string(), "host API `screen.orientation` is unavailable");

        let err = HostError::Failed {
            api: HostApi::Document,
            message: "detached".to_string(),
        };
        assert_eq!(err.api(), HostApi::Document);
        assert!(err.to_string().contains("detached"));
    }

    #[test]
    fn test_navigator_tolerates_missing_fields() {
        let nav: NavigatorInfo =
            serde_json::from_str(r#"{"userAgent": "Mozilla/5.0", "hardwareConcurrency": 8}"#)
                .unwrap();
        assert_eq!(nav.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(nav.hardware_concurrency, Some(8));
        assert!(nav.device_memory.is_none());
        assert!(nav.connection.is_none());
    }

    #[test]
    fn test_document_state_spelling() {
        let doc: DocumentInfo =
            serde_json::from_str(r#"{"visibilityState": "hidden", "readyState": "loading"}"#)
                .unwrap();
        assert_eq!(doc.visibility_state, VisibilityState::Hidden);
        assert_eq!(doc.ready_state, ReadyState::Loading);
    }
}
