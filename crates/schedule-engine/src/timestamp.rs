//! Timestamp and timezone parsing shared by extraction and import.
//!
//! Timestamps coming from the extraction model or from hand-edited JSON are
//! ISO 8601 strings that may or may not carry an offset. Offset-less values
//! are wall-clock times in a caller-supplied IANA zone.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ScheduleError};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an IANA timezone name (e.g. "Asia/Ho_Chi_Minh").
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Parse an ISO 8601 timestamp into UTC.
///
/// Accepts RFC 3339 (with `Z` or an offset), an offset-less date-time, or a
/// bare date (midnight). Offset-less values are interpreted in `tz`.
pub fn parse_timestamp(s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return localize(ndt, tz)
                .ok_or_else(|| ScheduleError::InvalidTimestamp(s.to_string()));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return localize(ndt, tz)
                .ok_or_else(|| ScheduleError::InvalidTimestamp(s.to_string()));
        }
    }

    Err(ScheduleError::InvalidTimestamp(s.to_string()))
}

/// Resolve a wall-clock time in `tz` to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap are shifted forward by the length of a typical gap (one hour).
pub fn localize(ndt: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&ndt) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => tz
            .from_local_datetime(&(ndt + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}
