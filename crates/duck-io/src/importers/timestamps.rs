use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use duck_core::{DuckError, DuckResult};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parses an index cell. Date-only values map to midnight; values with a
/// UTC offset keep their local wall-clock time.
pub fn parse_timestamp(raw: &str) -> DuckResult<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(ts);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.naive_local())
        .map_err(|_| DuckError::Parse(format!("unrecognized timestamp '{raw}'")))
}

/// Inverse of [`parse_timestamp`] for export: midnight renders as a bare date.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.time() == NaiveTime::MIN {
        ts.format("%Y-%m-%d").to_string()
    } else if ts.nanosecond() == 0 {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}
