//! Millisecond durations in the cluster's textual format

use crate::io::{StreamInput, StreamOutput, Streamable};
use crate::{EsClientError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;
const MILLIS_PER_WEEK: u64 = 7 * MILLIS_PER_DAY;

/// Suffixes in the order they must be tried; `ms` has to win over `m` and `s`
const UNITS: [(&str, u64); 6] = [
    ("ms", 1),
    ("s", MILLIS_PER_SECOND),
    ("m", MILLIS_PER_MINUTE),
    ("h", MILLIS_PER_HOUR),
    ("d", MILLIS_PER_DAY),
    ("w", MILLIS_PER_WEEK),
];

/// A duration with millisecond precision
///
/// Renders as `"30s"`, `"1m"`, `"1500ms"` and so on, which is also the format
/// the cluster expects in query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeValue {
    millis: u64,
}

impl TimeValue {
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub const fn from_secs(seconds: u64) -> Self {
        Self::from_millis(seconds * MILLIS_PER_SECOND)
    }

    pub const fn from_minutes(minutes: u64) -> Self {
        Self::from_millis(minutes * MILLIS_PER_MINUTE)
    }

    pub const fn from_hours(hours: u64) -> Self {
        Self::from_millis(hours * MILLIS_PER_HOUR)
    }

    pub const fn millis(&self) -> u64 {
        self.millis
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }

    /// Parse `"500ms"`, `"1.5s"`, `"1m"`, `"2h"`, `"1d"`, `"1w"` or plain milliseconds
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let invalid = || EsClientError::decode(format!("failed to parse time value [{value}]"));

        if let Ok(millis) = value.parse::<u64>() {
            return Ok(Self::from_millis(millis));
        }

        let lower = value.to_ascii_lowercase();
        let (number, factor) = UNITS
            .iter()
            .find_map(|(suffix, factor)| lower.strip_suffix(suffix).map(|n| (n, *factor)))
            .ok_or_else(invalid)?;

        let number: f64 = number.trim().parse().map_err(|_| invalid())?;
        if !number.is_finite() || number < 0.0 {
            return Err(invalid());
        }
        Ok(Self::from_millis((number * factor as f64).round() as u64))
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis == 0 {
            return write!(f, "0ms");
        }
        let (suffix, factor) = UNITS
            .iter()
            .rev()
            .find(|(_, factor)| self.millis % factor == 0)
            .copied()
            .unwrap_or(("ms", 1));
        write!(f, "{}{}", self.millis / factor, suffix)
    }
}

impl FromStr for TimeValue {
    type Err = EsClientError;

    fn from_str(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Duration> for TimeValue {
    fn from(duration: Duration) -> Self {
        Self::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

impl From<TimeValue> for Duration {
    fn from(value: TimeValue) -> Self {
        value.as_duration()
    }
}

impl Serialize for TimeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Millis(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Millis(millis) => Ok(Self::from_millis(millis)),
            Raw::Text(text) => Self::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}

impl Streamable for TimeValue {
    fn read_from(input: &mut StreamInput) -> Result<Self> {
        let millis = input.read_long()?;
        u64::try_from(millis)
            .map(Self::from_millis)
            .map_err(|_| EsClientError::decode(format!("negative time value [{millis}]")))
    }

    fn write_to(&self, out: &mut StreamOutput) -> Result<()> {
        let millis = i64::try_from(self.millis)
            .map_err(|_| EsClientError::encode(format!("time value too large [{}]", self.millis)))?;
        out.write_long(millis);
        Ok(())
    }
}
