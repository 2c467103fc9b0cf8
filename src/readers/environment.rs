//! `basicEnvironment`: what the navigator reports about the browser.

use crate::host::{
    EnvironmentProvider, HostError, NetworkConnection, UserActivation, UserAgentData,
    VirtualKeyboard,
};
use crate::readers::non_empty;
use serde::{Deserialize, Serialize};

/// Browser and device environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicEnvironment {
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub languages: Vec<String>,
    /// Approximate RAM in GiB (Device Memory API)
    pub device_memory: Option<f64>,
    pub hardware_concurrency: Option<u32>,
    pub vendor: Option<String>,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub max_touch_points: u32,
    pub online_status: bool,
    pub cookie_enabled: bool,
    pub do_not_track: Option<String>,
    pub pdf_viewer_status: bool,
    pub web_driver: bool,
    pub connection: NetworkConnection,
    pub mime_types: Vec<String>,
    pub plugins: Vec<String>,
    pub product: Option<String>,
    pub product_sub: Option<String>,
    pub user_activation: UserActivation,
    pub user_agent_data: UserAgentData,
    pub virtual_keyboard: VirtualKeyboard,
}

/// Read the navigator section.
///
/// Zero counts and empty strings are reported as `null`, matching a
/// browser-side falsy check.
pub fn basic_environment(host: &dyn EnvironmentProvider) -> Result<BasicEnvironment, HostError> {
    let nav = host.navigator()?;

    Ok(BasicEnvironment {
        user_agent: non_empty(nav.user_agent),
        platform: non_empty(nav.platform),
        language: non_empty(nav.language),
        languages: nav.languages.unwrap_or_default(),
        device_memory: nav.device_memory.filter(|m| *m > 0.0),
        hardware_concurrency: nav.hardware_concurrency.filter(|c| *c > 0),
        vendor: non_empty(nav.vendor),
        app_name: non_empty(nav.app_name),
        app_version: non_empty(nav.app_version),
        max_touch_points: nav.max_touch_points.unwrap_or(0),
        online_status: nav.on_line.unwrap_or(false),
        cookie_enabled: nav.cookie_enabled.unwrap_or(false),
        do_not_track: non_empty(nav.do_not_track),
        pdf_viewer_status: nav.pdf_viewer_enabled.unwrap_or(false),
        web_driver: nav.webdriver.unwrap_or(false),
        connection: nav.connection.unwrap_or_default(),
        mime_types: nav.mime_types.unwrap_or_default(),
        plugins: nav.plugins.unwrap_or_default(),
        product: non_empty(nav.product),
        product_sub: non_empty(nav.product_sub),
        user_activation: nav.user_activation.unwrap_or_default(),
        user_agent_data: nav.user_agent_data.unwrap_or_default(),
        virtual_keyboard: nav.virtual_keyboard.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostApi, StaticHost};

    #[test]
    fn test_missing_fields_coalesce() {
        let host = StaticHost::default();
        let env = basic_environment(&host).unwrap();

        assert!(env.device_memory.is_none());
        assert!(env.user_agent.is_none());
        assert!(env.languages.is_empty());
        assert_eq!(env.max_touch_points, 0);
        assert!(!env.online_status);
        assert!(!env.web_driver);
        assert_eq!(env.connection, NetworkConnection::default());
    }

    #[test]
    fn test_falsy_values_become_null() {
        let host = StaticHost::from_json(
            r#"{"navigator": {"hardwareConcurrency": 0, "deviceMemory": 0, "vendor": "", "doNotTrack": "1"}}"#,
        )
        .unwrap();
        let env = basic_environment(&host).unwrap();

        assert!(env.hardware_concurrency.is_none());
        assert!(env.device_memory.is_none());
        assert!(env.vendor.is_none());
        assert_eq!(env.do_not_track.as_deref(), Some("1"));
    }

    #[test]
    fn test_reports_navigator_values() {
        let host = StaticHost::from_json(
            r#"{"navigator": {
                "userAgent": "Mozilla/5.0 (X11; Linux x86_64)",
                "languages": ["en-US", "en"],
                "deviceMemory": 8,
                "onLine": true,
                "connection": {"effectiveType": "4g", "rtt": 50}
            }}"#,
        )
        .unwrap();
        let env = basic_environment(&host).unwrap();

        assert_eq!(env.languages, vec!["en-US", "en"]);
        assert_eq!(env.device_memory, Some(8.0));
        assert!(env.online_status);
        assert_eq!(env.connection.effective_type.as_deref(), Some("4g"));
        assert_eq!(env.connection.rtt, Some(50));
    }

    #[test]
    fn test_serializes_missing_memory_as_null() {
        let env = basic_environment(&StaticHost::default()).unwrap();
        let json = serde_json::to_value(&env).unwrap();
        assert!(json["deviceMemory"].is_null());
        assert_eq!(json["maxTouchPoints"], 0);
    }

    #[test]
    fn test_navigator_failure_propagates() {
        let host = StaticHost::default();
        host.fail(HostApi::Navigator);
        assert!(basic_environment(&host).is_err());
    }
}
