//! Datetime parsing for session schedules.
//!
//! Clients send schedule times in whatever shape their form produced:
//! RFC 3339, an HTML `datetime-local` value (`2024-01-01T10:00`), or a
//! SQL-style `2024-01-01 10:00:00`. Values without an offset are wall-clock
//! times in the deployment's local zone and are resolved with the configured
//! UTC offset. Everything is emitted back as RFC 3339 UTC.

use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized datetime: {0}")]
pub struct TimeParseError(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized UTC offset: {0}")]
pub struct OffsetParseError(pub String);

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A schedule time as a client sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleTime {
    /// Carried its own offset.
    Exact(DateTime<Utc>),
    /// Wall-clock time without an offset.
    Local(NaiveDateTime),
}

impl ScheduleTime {
    /// Parses a datetime in any of the accepted input shapes.
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let input = input.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(ScheduleTime::Exact(dt.with_timezone(&Utc)));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .map(ScheduleTime::Local)
            .ok_or_else(|| TimeParseError(input.to_string()))
    }

    /// The UTC instant, reading a local value at `offset`.
    pub fn resolve(self, offset: FixedOffset) -> DateTime<Utc> {
        match self {
            ScheduleTime::Exact(dt) => dt,
            ScheduleTime::Local(naive) => {
                naive.and_utc() - Duration::seconds(i64::from(offset.local_minus_utc()))
            }
        }
    }
}

impl From<DateTime<Utc>> for ScheduleTime {
    fn from(dt: DateTime<Utc>) -> Self {
        ScheduleTime::Exact(dt)
    }
}

impl FromStr for ScheduleTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScheduleTime::parse(s)
    }
}

impl<'de> Deserialize<'de> for ScheduleTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ScheduleTime::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Deserializes an optional schedule time; `null` and blank strings are `None`.
///
/// Use together with `#[serde(default)]` so a missing field is `None` too.
pub fn deserialize_optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ScheduleTime>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => ScheduleTime::parse(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Parses `+07:00`, `-0530`, `+7`, `Z` or `UTC`.
pub fn parse_utc_offset(input: &str) -> Result<FixedOffset, OffsetParseError> {
    let raw = input.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let err = || OffsetParseError(raw.to_string());
    let (sign, rest) = if let Some(rest) = raw.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = raw.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(err());
    };
    if rest.is_empty() || !rest.is_ascii() {
        return Err(err());
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some(parts) => parts,
        None if rest.len() > 2 => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().map_err(|_| err())?;
    let minutes: i32 = minutes.parse().map_err(|_| err())?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(err());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(err)
}

/// Serde helper for configuration values holding a UTC offset.
pub fn deserialize_utc_offset<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<FixedOffset, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_utc_offset(&raw).map_err(serde::de::Error::custom)
}
