//! In-memory host backed by a JSON fixture.
//!
//! `StaticHost` stands in for a real browser: it answers every provider call
//! from a [`HostFixture`] that can be loaded from disk and mutated while a
//! collector is reading from it. Individual host APIs can be made to fail.

use crate::host::types::{
    DocumentInfo, HostApi, HostError, IntlInfo, LocationInfo, NavigatorInfo, ScreenInfo,
    ScreenOrientation, ViewportInfo, VisibilityState,
};
use crate::host::EnvironmentProvider;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Complete description of a host's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostFixture {
    /// Whether a window and document are present
    pub browser: bool,
    /// Fixed clock; when absent the system clock is used
    pub now: Option<DateTime<Utc>>,
    pub navigator: NavigatorInfo,
    pub document: DocumentInfo,
    pub location: LocationInfo,
    pub screen: ScreenInfo,
    pub viewport: ViewportInfo,
    /// `screen.orientation`; absent means the API is not supported
    pub orientation: Option<ScreenOrientation>,
    /// Media queries that currently match, verbatim
    pub matching_media: Vec<String>,
    pub intl: IntlInfo,
    /// Host APIs that fail when read
    pub failing: Vec<HostApi>,
}

impl Default for HostFixture {
    fn default() -> Self {
        Self {
            browser: true,
            now: None,
            navigator: NavigatorInfo::default(),
            document: DocumentInfo::default(),
            location: LocationInfo::default(),
            screen: ScreenInfo::default(),
            viewport: ViewportInfo::default(),
            orientation: None,
            matching_media: Vec::new(),
            intl: IntlInfo::default(),
            failing: Vec::new(),
        }
    }
}

/// Errors loading a host fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("could not read host fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid host fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A host whose state is held in memory.
#[derive(Debug, Default)]
pub struct StaticHost {
    fixture: RwLock<HostFixture>,
}

impl StaticHost {
    pub fn new(fixture: HostFixture) -> Self {
        Self {
            fixture: RwLock::new(fixture),
        }
    }

    /// Parse a host from fixture JSON.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let fixture: HostFixture = serde_json::from_str(json)?;
        Ok(Self::new(fixture))
    }

    /// Load a host from a fixture file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Copy of the current fixture.
    pub fn fixture(&self) -> HostFixture {
        self.read().clone()
    }

    /// Mutate host state in place.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut HostFixture),
    {
        f(&mut self.write());
    }

    pub fn set_title(&self, title: &str) {
        self.update(|h| h.document.title = title.to_string());
    }

    pub fn set_visibility(&self, state: VisibilityState) {
        self.update(|h| h.document.visibility_state = state);
    }

    pub fn set_focus(&self, focused: bool) {
        self.update(|h| h.document.has_focus = focused);
    }

    /// Pin the host clock.
    pub fn set_now(&self, now: DateTime<Utc>) {
        self.update(|h| h.now = Some(now));
    }

    /// Move a pinned clock forward. Has no effect on the system clock.
    pub fn advance_clock(&self, by: Duration) {
        self.update(|h| {
            if let Some(now) = h.now {
                h.now = Some(now + by);
            }
        });
    }

    /// Make reads of `api` fail until [`StaticHost::restore`] is called.
    pub fn fail(&self, api: HostApi) {
        self.update(|h| {
            if !h.failing.contains(&api) {
                h.failing.push(api);
            }
        });
    }

    pub fn restore(&self, api: HostApi) {
        self.update(|h| h.failing.retain(|a| *a != api));
    }

    fn read(&self) -> RwLockReadGuard<'_, HostFixture> {
        self.fixture.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HostFixture> {
        self.fixture.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Read one part of the fixture, honoring injected failures.
    fn get<T, F>(&self, api: HostApi, f: F) -> Result<T, HostError>
    where
        F: FnOnce(&HostFixture) -> T,
    {
        let fixture = self.read();
        if fixture.failing.contains(&api) {
            return Err(HostError::Failed {
                api,
                message: "injected failure".to_string(),
            });
        }
        Ok(f(&fixture))
    }
}

impl EnvironmentProvider for StaticHost {
    fn is_browser(&self) -> bool {
        self.read().browser
    }

    fn now(&self) -> DateTime<Utc> {
        self.read().now.unwrap_or_else(Utc::now)
    }

    fn navigator(&self) -> Result<NavigatorInfo, HostError> {
        self.get(HostApi::Navigator, |h| h.navigator.clone())
    }

    fn document(&self) -> Result<DocumentInfo, HostError> {
        self.get(HostApi::Document, |h| h.document.clone())
    }

    fn location(&self) -> Result<LocationInfo, HostError> {
        self.get(HostApi::Location, |h| h.location.clone())
    }

    fn screen(&self) -> Result<ScreenInfo, HostError> {
        self.get(HostApi::Screen, |h| h.screen.clone())
    }

    fn viewport(&self) -> Result<ViewportInfo, HostError> {
        self.get(HostApi::Viewport, |h| h.viewport.clone())
    }

    fn orientation(&self) -> Result<ScreenOrientation, HostError> {
        self.get(HostApi::Orientation, |h| h.orientation.clone())?
            .ok_or(HostError::Unavailable(HostApi::Orientation))
    }

    fn match_media(&self, query: &str) -> Result<bool, HostError> {
        self.get(HostApi::MatchMedia, |h| {
            h.matching_media.iter().any(|q| q == query)
        })
    }

    fn intl(&self) -> Result<IntlInfo, HostError> {
        self.get(HostApi::Intl, |h| h.intl.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_fixture_is_a_browser() {
        let host = StaticHost::from_json("{}").unwrap();
        assert!(host.is_browser());
        assert_eq!(host.location().unwrap().href, "about:blank");
        assert!(host.navigator().unwrap().user_agent.is_none());
    }

    #[test]
    fn test_missing_orientation_is_unavailable() {
        let host = StaticHost::default();
        assert_eq!(
            host.orientation(),
            Err(HostError::Unavailable(HostApi::Orientation))
        );
    }

    #[test]
    fn test_injected_failure_and_restore() {
        let host = StaticHost::default();
        host.fail(HostApi::Document);
        assert!(host.document().is_err());
        assert!(host.location().is_ok());

        host.restore(HostApi::Document);
        assert!(host.document().is_ok());
    }

    #[test]
    fn test_match_media_is_exact() {
        let host = StaticHost::from_json(
            r#"{"matchingMedia": ["(prefers-color-scheme: dark)"]}"#,
        )
        .unwrap();
        assert!(host.match_media("(prefers-color-scheme: dark)").unwrap());
        assert!(!host.match_media("(prefers-contrast: more)").unwrap());
    }

    #[test]
    fn test_pinned_clock_advances() {
        let host = StaticHost::default();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        host.set_now(start);
        host.advance_clock(Duration::milliseconds(250));
        assert_eq!(host.now(), start + Duration::milliseconds(250));
    }

    #[test]
    fn test_setters_mutate_document() {
        let host = StaticHost::default();
        host.set_title("Checkout");
        host.set_visibility(VisibilityState::Hidden);
        host.set_focus(true);

        let doc = host.document().unwrap();
        assert_eq!(doc.title, "Checkout");
        assert_eq!(doc.visibility_state, VisibilityState::Hidden);
        assert!(doc.has_focus);
    }

    #[test]
    fn test_invalid_fixture_is_rejected() {
        let err = StaticHost::from_json("{\"browser\": 3}").unwrap_err();
        assert!(matches!(err, FixtureError::Parse(_)));
    }
}
