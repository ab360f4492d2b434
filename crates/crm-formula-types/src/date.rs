//! Date parsing and formatting for formula values
//!
//! Record fields carry dates as strings (`"2024-06-15"`,
//! `"2024-06-15T10:30:00Z"`). Values without an explicit offset are read as
//! UTC so the same record always yields the same instant regardless of the
//! host time zone.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("ISO date pattern is valid"));

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%a %b %d %Y %H:%M:%S GMT%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Check whether a string contains a `YYYY-MM-DD` date.
///
/// This is the gate for promoting resolved field values to dates; the
/// string must also parse with [`parse_date`] to be promoted.
pub fn looks_like_iso_date(input: &str) -> bool {
    ISO_DATE.is_match(input)
}

/// Parse a date or date-time string.
///
/// Accepts RFC 3339, RFC 2822, ISO dates (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`),
/// ISO date-times with `T` or space separators, optional fractional seconds
/// and optional `Z`/offset, and the `Www Mmm DD YYYY HH:MM:SS GMT+hhmm`
/// form produced by [`format_js_date`].
pub fn parse_date(input: &str) -> Option<DateTime<FixedOffset>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    let naive_input = s.strip_suffix('Z').unwrap_or(s);
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_input, format) {
            return Some(utc(naive));
        }
    }

    if let Some(midnight) = parse_partial_date(s).and_then(|date| date.and_hms_opt(0, 0, 0)) {
        return Some(utc(midnight));
    }

    DateTime::parse_from_rfc2822(s).ok()
}

fn parse_partial_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    let mut parts = s.split('-');
    let year = parts.next().filter(|y| y.len() == 4)?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(m) if m.len() == 2 => m.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn utc(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(&naive).fixed_offset()
}

/// Render a date the way JavaScript's `String(date)` does, without the
/// trailing time zone name: `Sat Jun 15 2024 00:00:00 GMT+0000`.
pub fn format_js_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}
