//! Inclusive date-window filtering.

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::error::AttendanceError;
use crate::extraction::timestamp::parse_timestamp;

/// Optional inclusive bounds on punch time. `None` is unbounded.
///
/// `start <= end` is not enforced; an inverted window simply admits nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| *ts >= start) && self.end.map_or(true, |end| *ts <= end)
    }

    /// Build a window from the request's `startDate` / `endDate` strings.
    ///
    /// Empty strings are absent bounds. A date-only end bound runs to the
    /// last millisecond of that day.
    pub fn from_request(
        start: Option<&str>,
        end: Option<&str>,
        offset: &FixedOffset,
    ) -> Result<Self, AttendanceError> {
        let start = parse_bound("startDate", start, offset)?.map(|(instant, _)| instant);
        let end = parse_bound("endDate", end, offset)?.map(|(instant, date_only)| {
            if date_only {
                instant + Duration::milliseconds(86_400_000 - 1)
            } else {
                instant
            }
        });
        Ok(Self { start, end })
    }
}

fn parse_bound(
    name: &str,
    raw: Option<&str>,
    offset: &FixedOffset,
) -> Result<Option<(DateTime<Utc>, bool)>, AttendanceError> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };
    parse_timestamp(raw, offset)
        .map(|parsed| Some((parsed.instant, parsed.date_only)))
        .ok_or_else(|| AttendanceError::InvalidRequest(format!("unparseable {}: {:?}", name, raw)))
}
