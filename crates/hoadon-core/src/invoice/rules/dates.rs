//! Date handling for retailer payloads and scraped pages.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde_json::Value;

use super::patterns::NUMERIC_DATE;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// First `D/M/YYYY`-like token in `text`, without calendar validation.
pub fn first_numeric_date(text: &str) -> Option<String> {
    NUMERIC_DATE.find(text).map(|m| m.as_str().to_string())
}

/// Interpret a retailer timestamp.
///
/// Strings with an offset are taken as-is, naive date-times are read in
/// `local` (the retailer's zone), bare dates are midnight UTC and numbers
/// are epoch milliseconds.
pub fn parse_timestamp(value: &Value, local: FixedOffset) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s.trim(), local),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str, local: FixedOffset) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return local
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Render as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Calendar date of `now` in `local`, as `D/M/YYYY` without zero padding.
pub fn day_label(now: DateTime<Utc>, local: FixedOffset) -> String {
    now.with_timezone(&local).format("%-d/%-m/%Y").to_string()
}

/// Offset for a whole number of hours east of UTC, clamped to a valid range.
pub fn offset_hours(hours: i32) -> FixedOffset {
    let hours = hours.clamp(-23, 23);
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}
