//! Timestamps for planned activities.
//!
//! Planning happens on `DateTime<FixedOffset>` so the caller's offset is
//! kept: the calendar date of a duty window is the caller's local date,
//! not UTC's. Text conversion happens only at the web boundary.

use chrono::{DateTime, Duration, FixedOffset, SecondsFormat};

/// A point in time with the caller's UTC offset.
pub type Timestamp = DateTime<FixedOffset>;

/// Error returned when parsing an invalid timestamp string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: expected RFC 3339 (e.g. 2024-01-01T06:00:00Z)")]
pub struct TimeError {
    input: String,
}

/// Parse an RFC 3339 / ISO-8601 timestamp with an explicit offset.
///
/// # Examples
///
/// ```
/// use hos_server::domain::{format_timestamp, parse_timestamp};
///
/// let ts = parse_timestamp("2024-01-01T06:00:00-05:00").unwrap();
/// assert_eq!(format_timestamp(&ts), "2024-01-01T06:00:00-05:00");
///
/// assert!(parse_timestamp("2024-01-01 06:00").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<Timestamp, TimeError> {
    DateTime::parse_from_rfc3339(s.trim()).map_err(|_| TimeError {
        input: s.to_string(),
    })
}

/// Format a timestamp as RFC 3339 with whole seconds (`Z` for UTC).
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Whole minutes from `from` to `to` (negative if `to` is earlier).
pub fn minutes_between(from: &Timestamp, to: &Timestamp) -> i64 {
    to.signed_duration_since(*from).num_minutes()
}

/// A duration of `minutes` whole minutes, clamped to zero.
pub fn minutes(minutes: i64) -> Duration {
    Duration::minutes(minutes.max(0))
}
