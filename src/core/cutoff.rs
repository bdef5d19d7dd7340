use std::fmt;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::error::ConfigError;

const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];
const PRINT_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Day-granular retention boundary.
///
/// Messages strictly older than the boundary are eligible for deletion; a
/// message at or after it ends the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff {
    date: NaiveDate,
    epoch_secs: i64,
}

impl Cutoff {
    /// Parses `YYYY/MM/DD` (or `YYYY-MM-DD`) as local midnight.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
            .map(Self::local_midnight)
            .ok_or_else(|| ConfigError::Cutoff {
                input: input.to_string(),
            })
    }

    pub fn local_midnight(date: NaiveDate) -> Self {
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        // DST gaps have no local midnight; fall back to reading it as UTC.
        let epoch_secs = Local
            .from_local_datetime(&midnight)
            .earliest()
            .map_or_else(|| midnight.and_utc().timestamp(), |dt| dt.timestamp());
        Self { date, epoch_secs }
    }

    pub fn from_epoch_secs(epoch_secs: i64) -> Self {
        let date = DateTime::<Utc>::from_timestamp(epoch_secs, 0)
            .map_or(NaiveDate::MIN, |dt| dt.date_naive());
        Self { date, epoch_secs }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn epoch_secs(&self) -> i64 {
        self.epoch_secs
    }

    /// `true` once `timestamp` (seconds since epoch) is at or past the boundary.
    #[allow(clippy::cast_precision_loss)]
    pub fn is_reached(&self, timestamp: f64) -> bool {
        timestamp >= self.epoch_secs as f64
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y/%m/%d"))
    }
}

/// Parses a service timestamp such as `"1654041600.000100"`.
pub fn parse_timestamp(ts: &str) -> Option<f64> {
    ts.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
}

/// Local wall-clock rendering of a service timestamp, for log lines.
#[allow(clippy::cast_possible_truncation)]
pub fn describe_timestamp(timestamp: f64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp.trunc() as i64, 0).map_or_else(
        || format!("{timestamp}"),
        |dt| dt.with_timezone(&Local).format(PRINT_FORMAT).to_string(),
    )
}
