//! Host environment access for the collector.
//!
//! The field readers never touch browser globals directly. They read through
//! an [`EnvironmentProvider`], which a browser binding, a recorded fixture or
//! a test double can implement.

pub mod static_host;
pub mod types;

use chrono::{DateTime, Utc};

// Re-export commonly used types
pub use static_host::{FixtureError, HostFixture, StaticHost};
pub use types::{
    Brand, DocumentInfo, HostApi, HostError, IntlInfo, LocationInfo, NavigatorInfo,
    NetworkConnection, ReadyState, ScreenInfo, ScreenOrientation, UserActivation, UserAgentData,
    ViewportInfo, VirtualKeyboard, VisibilityState,
};

/// Read-only access to a browser-like host.
///
/// Every method reads current host state; none of them mutate it. A method
/// returns an error only when the host API itself is absent or throws.
pub trait EnvironmentProvider: Send + Sync {
    /// Whether the host looks like a browser (has a window and a document).
    fn is_browser(&self) -> bool;

    /// Current wall-clock time as the host sees it.
    fn now(&self) -> DateTime<Utc>;

    fn navigator(&self) -> Result<NavigatorInfo, HostError>;

    fn document(&self) -> Result<DocumentInfo, HostError>;

    fn location(&self) -> Result<LocationInfo, HostError>;

    fn screen(&self) -> Result<ScreenInfo, HostError>;

    fn viewport(&self) -> Result<ViewportInfo, HostError>;

    /// `screen.orientation`; hosts without the API return an error.
    fn orientation(&self) -> Result<ScreenOrientation, HostError>;

    /// Evaluate a CSS media query, as `window.matchMedia(query).matches`.
    fn match_media(&self, query: &str) -> Result<bool, HostError>;

    fn intl(&self) -> Result<IntlInfo, HostError>;
}
