//! Field readers.
//!
//! Each reader produces one section of a snapshot from the host. Readers
//! are side-effect free and independent of each other. Missing host values
//! are coalesced to `null`, `false`, `0` or an empty container; only a
//! failing host API produces an error.

pub mod environment;
pub mod screen;
pub mod tab;
pub mod time_locale;
pub mod url;

pub use environment::{basic_environment, BasicEnvironment};
pub use screen::{screen_display, ScreenDisplay};
pub use tab::{tab_details, TabDetails};
pub use time_locale::{time_locale, TimeLocale};
pub use url::{url_details, UrlDetails};

/// Treat an empty string the way a falsy check would: as missing.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
