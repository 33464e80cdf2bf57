// Date utility functions
// Parsing of ISO-8601 input and consistent display formatting

use chrono::{
    DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Offset-less date-time layouts accepted in addition to RFC 3339.
/// These are the shapes produced by `datetime-local` form inputs.
const LOCAL_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Failure to turn a date string into an absolute instant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("date value is empty")]
    Empty,
    #[error("invalid date '{0}': expected an ISO-8601 timestamp")]
    InvalidDate(String),
    #[error("local time '{0}' does not exist in the current timezone")]
    NonexistentLocalTime(String),
}

/// Parse an ISO-8601 timestamp into a UTC instant, interpreting offset-less
/// date-times in the host's local timezone.
///
/// Accepted shapes:
/// * RFC 3339 with an offset (`2025-01-01T09:00:00Z`, `2025-01-01T18:00:00+09:00`)
/// * local date-times (`2025-01-01T09:00`, `2025-01-01T09:00:00.250`)
/// * bare dates (`2025-01-01`), which denote UTC midnight
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, DateParseError> {
    parse_instant_in(value, &Local)
}

/// Same as [`parse_instant`] with an explicit zone for offset-less input.
pub fn parse_instant_in<Tz: TimeZone>(
    value: &str,
    zone: &Tz,
) -> Result<DateTime<Utc>, DateParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in LOCAL_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return match zone.from_local_datetime(&naive) {
                LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
                // Ambiguous wall time (DST fall-back): take the earlier instant
                LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
                LocalResult::None => {
                    Err(DateParseError::NonexistentLocalTime(trimmed.to_string()))
                }
            };
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(DateParseError::InvalidDate(trimmed.to_string()))
}

/// Display language for formatted dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateLocale {
    /// `2025年1月1日 09:00`
    #[default]
    Ja,
    /// `January 1, 2025 09:00`
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateFormatOptions {
    pub include_time: bool,
    pub locale: DateLocale,
}

/// Formats an event date in the host's local timezone.
pub fn format_event_date(date: DateTime<Utc>, options: DateFormatOptions) -> String {
    format_event_date_in(date, &Local, options)
}

pub fn format_event_date_in<Tz>(date: DateTime<Utc>, zone: &Tz, options: DateFormatOptions) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let local = date.with_timezone(zone);
    let pattern = match (options.locale, options.include_time) {
        (DateLocale::Ja, false) => "%Y年%-m月%-d日",
        (DateLocale::Ja, true) => "%Y年%-m月%-d日 %H:%M",
        (DateLocale::En, false) => "%B %-d, %Y",
        (DateLocale::En, true) => "%B %-d, %Y %H:%M",
    };
    local.format(pattern).to_string()
}

/// Event start date including the time of day.
pub fn format_event_start_date(date: DateTime<Utc>, locale: DateLocale) -> String {
    format_event_date(
        date,
        DateFormatOptions {
            include_time: true,
            locale,
        },
    )
}

/// Date only, used for created/updated metadata.
pub fn format_simple_date(date: DateTime<Utc>, locale: DateLocale) -> String {
    format_event_date(
        date,
        DateFormatOptions {
            include_time: false,
            locale,
        },
    )
}
