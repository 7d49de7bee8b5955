//! Punch-time parsing cascade.
//!
//! The portal prints timestamps in whatever format the device firmware and
//! server locale produce. Forms are tried in order:
//!
//! 1. RFC 3339 / ISO-8601 with an explicit offset
//! 2. Naive date-time (`-` or `/` separated, `T` or space before the time,
//!    optional seconds, fraction, AM/PM)
//! 3. Naive date only, at midnight
//! 4. All-digit values above 1 000 000 000 as Unix epoch seconds
//!
//! Naive forms are read in the device's UTC offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Smallest all-digit value treated as epoch seconds.
pub const EPOCH_SECONDS_THRESHOLD: i64 = 1_000_000_000;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

// Month-first before day-first: the portal's ASP pages render US dates.
// Day-first only wins when the month-first reading is not a real date.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y-%m-%d %I:%M %p",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d %I:%M:%S %p",
    "%Y/%m/%d %I:%M %p",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d-%m-%Y %I:%M:%S %p",
    "%d-%m-%Y %I:%M %p",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y"];

/// A parsed timestamp plus whether it carried a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    pub instant: DateTime<Utc>,
    pub date_only: bool,
}

/// Parse a punch time; `None` when no form in the cascade yields a real
/// calendar instant.
pub fn parse_punch_time(raw: &str, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    parse_timestamp(raw, offset).map(|p| p.instant)
}

/// Full cascade, keeping the date-only flag for window bounds.
pub fn parse_timestamp(raw: &str, offset: &FixedOffset) -> Option<ParsedTimestamp> {
    let text = collapse_ws(raw);
    if text.is_empty() {
        return None;
    }

    if let Some(instant) = parse_with_offset(&text) {
        return Some(ParsedTimestamp { instant, date_only: false });
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&text, fmt) {
            if let Some(instant) = localize(naive, offset) {
                return Some(ParsedTimestamp { instant, date_only: false });
            }
        }
    }

    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&text, fmt) {
            if let Some(instant) = date.and_hms_opt(0, 0, 0).and_then(|dt| localize(dt, offset)) {
                return Some(ParsedTimestamp { instant, date_only: true });
            }
        }
    }

    parse_epoch_seconds(&text).map(|instant| ParsedTimestamp { instant, date_only: false })
}

fn parse_with_offset(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// All-digit strings above the threshold are epoch seconds.
fn parse_epoch_seconds(text: &str) -> Option<DateTime<Utc>> {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i64 = text.parse().ok()?;
    if value <= EPOCH_SECONDS_THRESHOLD {
        return None;
    }
    DateTime::from_timestamp(value, 0)
}

fn localize(naive: NaiveDateTime, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn collapse_ws(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
