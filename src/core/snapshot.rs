//! Snapshot records and the aggregator that builds them.
//!
//! A snapshot is one pass over every field reader, stamped with the reason
//! it was taken and the host time it was taken at. Snapshots are never
//! mutated; the next one supersedes the previous.

use crate::host::{EnvironmentProvider, HostError};
use crate::readers::{
    self, BasicEnvironment, ScreenDisplay, TabDetails, TimeLocale, UrlDetails,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why a snapshot was collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    #[default]
    #[serde(rename = "manual")]
    Manual,
    #[serde(rename = "load")]
    Load,
    #[serde(rename = "click")]
    Click,
    #[serde(rename = "input")]
    Input,
    #[serde(rename = "change")]
    Change,
    #[serde(rename = "scroll")]
    Scroll,
    #[serde(rename = "visibilitychange")]
    VisibilityChange,
    #[serde(rename = "updatedData")]
    UpdatedData,
}

impl Trigger {
    pub const ALL: [Trigger; 8] = [
        Trigger::Manual,
        Trigger::Load,
        Trigger::Click,
        Trigger::Input,
        Trigger::Change,
        Trigger::Scroll,
        Trigger::VisibilityChange,
        Trigger::UpdatedData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Manual => "manual",
            Trigger::Load => "load",
            Trigger::Click => "click",
            Trigger::Input => "input",
            Trigger::Change => "change",
            Trigger::Scroll => "scroll",
            Trigger::VisibilityChange => "visibilitychange",
            Trigger::UpdatedData => "updatedData",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trigger `{0}`")]
pub struct UnknownTrigger(pub String);

impl FromStr for Trigger {
    type Err = UnknownTrigger;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Trigger::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTrigger(s.to_string()))
    }
}

/// One complete collection of host state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub trigger: Trigger,
    /// Host time of collection, epoch milliseconds
    pub collected_at: i64,
    pub basic_environment: BasicEnvironment,
    pub tab_details: TabDetails,
    pub url_details: UrlDetails,
    pub screen_display: ScreenDisplay,
    pub time_locale: TimeLocale,
}

impl Snapshot {
    pub fn collected_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.collected_at).single()
    }
}

/// The snapshot sections, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapshotSection {
    BasicEnvironment,
    TabDetails,
    UrlDetails,
    ScreenDisplay,
    TimeLocale,
}

impl fmt::Display for SnapshotSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SnapshotSection::BasicEnvironment => "basicEnvironment",
            SnapshotSection::TabDetails => "tabDetails",
            SnapshotSection::UrlDetails => "urlDetails",
            SnapshotSection::ScreenDisplay => "screenDisplay",
            SnapshotSection::TimeLocale => "timeLocale",
        };
        f.write_str(name)
    }
}

/// A field reader failed, so no snapshot was produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to read {section}: {source}")]
pub struct CollectError {
    pub section: SnapshotSection,
    #[source]
    pub source: HostError,
}

fn section<T>(section: SnapshotSection, result: Result<T, HostError>) -> Result<T, CollectError> {
    result.map_err(|source| CollectError { section, source })
}

/// Run every field reader and compose the results.
///
/// The first reader error aborts collection.
pub fn collect_snapshot(
    host: &dyn EnvironmentProvider,
    trigger: Trigger,
) -> Result<Snapshot, CollectError> {
    let collected_at = host.now().timestamp_millis();

    Ok(Snapshot {
        trigger,
        collected_at,
        basic_environment: section(
            SnapshotSection::BasicEnvironment,
            readers::basic_environment(host),
        )?,
        tab_details: section(SnapshotSection::TabDetails, readers::tab_details(host))?,
        url_details: section(SnapshotSection::UrlDetails, readers::url_details(host))?,
        screen_display: section(SnapshotSection::ScreenDisplay, readers::screen_display(host))?,
        time_locale: section(SnapshotSection::TimeLocale, readers::time_locale(host))?,
    })
}
