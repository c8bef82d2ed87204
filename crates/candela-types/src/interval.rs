//! Aggregation interval definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Aggregation interval (bucket length).
///
/// Exactly one interval is active per aggregator instance at a time.
/// Changing it invalidates all in-memory bars: existing bars are never
/// re-bucketed into the new granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// 1-minute bars.
    #[default]
    #[serde(rename = "m1")]
    Minute1,
    /// 5-minute bars.
    #[serde(rename = "m5")]
    Minute5,
    /// 15-minute bars.
    #[serde(rename = "m15")]
    Minute15,
    /// 30-minute bars.
    #[serde(rename = "m30")]
    Minute30,
    /// 1-hour bars.
    #[serde(rename = "h1")]
    Hour1,
    /// 2-hour bars.
    #[serde(rename = "h2")]
    Hour2,
    /// 6-hour bars.
    #[serde(rename = "h6")]
    Hour6,
    /// Daily bars.
    #[serde(rename = "d1")]
    Day1,
}

impl Interval {
    /// Returns the bucket length in seconds.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        match self {
            Self::Minute1 => 60,
            Self::Minute5 => 300,
            Self::Minute15 => 900,
            Self::Minute30 => 1800,
            Self::Hour1 => 3600,
            Self::Hour2 => 7200,
            Self::Hour6 => 21600,
            Self::Day1 => 86400,
        }
    }

    /// Returns the bucket start for a timestamp (seconds since epoch).
    ///
    /// The bucket is the half-open window `[start, start + seconds())`
    /// containing `timestamp_secs`; its start is always interval-aligned.
    #[must_use]
    pub const fn bucket_start(&self, timestamp_secs: i64) -> i64 {
        let len = self.seconds();
        timestamp_secs.div_euclid(len) * len
    }

    /// Returns the interval as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "m1",
            Self::Minute5 => "m5",
            Self::Minute15 => "m15",
            Self::Minute30 => "m30",
            Self::Hour1 => "h1",
            Self::Hour2 => "h2",
            Self::Hour6 => "h6",
            Self::Day1 => "d1",
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Minute1 => "1 minute",
            Self::Minute5 => "5 minutes",
            Self::Minute15 => "15 minutes",
            Self::Minute30 => "30 minutes",
            Self::Hour1 => "1 hour",
            Self::Hour2 => "2 hours",
            Self::Hour6 => "6 hours",
            Self::Day1 => "1 day",
        }
    }

    /// Returns all supported intervals.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute1,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Hour2,
            Self::Hour6,
            Self::Day1,
        ]
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m1" | "1m" | "60" | "minute" | "minute1" => Ok(Self::Minute1),
            "m5" | "5m" | "300" | "minute5" => Ok(Self::Minute5),
            "m15" | "15m" | "900" | "minute15" => Ok(Self::Minute15),
            "m30" | "30m" | "1800" | "minute30" => Ok(Self::Minute30),
            "h1" | "1h" | "3600" | "hour" | "hour1" => Ok(Self::Hour1),
            "h2" | "2h" | "7200" | "hour2" => Ok(Self::Hour2),
            "h6" | "6h" | "21600" | "hour6" => Ok(Self::Hour6),
            "d1" | "1d" | "86400" | "day" | "day1" | "daily" => Ok(Self::Day1),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: m1, m5, m15, m30, h1, h2, h6, d1",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}
