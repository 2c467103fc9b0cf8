//! `timeLocale`: clock, time zone and locale settings.

use crate::host::{EnvironmentProvider, HostError};
use crate::readers::non_empty;
use chrono::{DateTime, Offset, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInfo {
    #[serde(rename = "nowISO")]
    pub now_iso: String,
    pub epoch_ms: i64,
    /// Minutes to add to local time to get UTC (positive west of Greenwich)
    pub timezone_offset_minutes: i32,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleInfo {
    pub primary: Option<String>,
    pub calendar: Option<String>,
    pub numbering_system: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLocale {
    pub time: TimeInfo,
    pub locale: LocaleInfo,
}

pub fn time_locale(host: &dyn EnvironmentProvider) -> Result<TimeLocale, HostError> {
    let now = host.now();
    let intl = host.intl()?;
    let language = host.navigator()?.language;

    let timezone = non_empty(intl.time_zone);

    Ok(TimeLocale {
        time: TimeInfo {
            now_iso: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            epoch_ms: now.timestamp_millis(),
            timezone_offset_minutes: timezone_offset_minutes(timezone.as_deref(), now),
            timezone,
        },
        locale: LocaleInfo {
            primary: non_empty(language),
            calendar: non_empty(intl.calendar),
            numbering_system: non_empty(intl.numbering_system),
        },
    })
}

/// Offset of `zone` at `at`, in the sign convention of `getTimezoneOffset`.
///
/// Unknown or missing zones are treated as UTC.
fn timezone_offset_minutes(zone: Option<&str>, at: DateTime<Utc>) -> i32 {
    zone.and_then(|z| z.parse::<Tz>().ok())
        .map(|tz| {
            let offset = tz.offset_from_utc_datetime(&at.naive_utc()).fix();
            -offset.local_minus_utc() / 60
        })
        .unwrap_or(0)
}
