//! Candidate row to `AttendanceRecord` normalization.
//!
//! Field order is fixed: `[empCode, punchTime, verifyType, status, workCode]`.
//! Anything after the fifth field is ignored.

use chrono::FixedOffset;
use uuid::Uuid;

use crate::error::RowRejection;
use crate::extraction::strategies::MIN_FIELDS;
use crate::extraction::timestamp::parse_punch_time;
use crate::storage::models::AttendanceRecord;
use crate::validation::row::check_employee_code;
use crate::validation::window::DateWindow;

pub const DEFAULT_VERIFY_TYPE: i64 = 1;
pub const DEFAULT_STATUS: i64 = 0;
pub const DEFAULT_WORK_CODE: i64 = 1;

/// Per-fetch inputs to normalization.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    pub serial_number: &'a str,
    pub window: &'a DateWindow,
    pub utc_offset: &'a FixedOffset,
}

/// Turn one candidate row into a record, or say why not.
pub fn normalize_row(
    fields: &[String],
    ctx: &NormalizeContext<'_>,
) -> Result<AttendanceRecord, RowRejection> {
    if fields.len() < MIN_FIELDS {
        return Err(RowRejection::TooFewFields(fields.len()));
    }

    let employee_code = check_employee_code(&fields[0])?;

    let raw_time = fields[1].trim();
    let punch_time = parse_punch_time(raw_time, ctx.utc_offset)
        .ok_or_else(|| RowRejection::BadTimestamp(raw_time.to_string()))?;

    if !ctx.window.contains(&punch_time) {
        return Err(RowRejection::OutsideWindow(punch_time.to_rfc3339()));
    }

    Ok(AttendanceRecord {
        id: Uuid::new_v4().to_string(),
        serial_number: ctx.serial_number.to_string(),
        employee_code,
        punch_time,
        verify_type: parse_int_field(&fields[2], DEFAULT_VERIFY_TYPE),
        status: parse_int_field(&fields[3], DEFAULT_STATUS),
        work_code: parse_int_field(&fields[4], DEFAULT_WORK_CODE),
    })
}

/// Leading-integer parse: optional sign, then digits up to the first
/// non-digit (`"3abc"` is 3). No digits, or overflow, gives `default`.
pub fn parse_int_field(field: &str, default: i64) -> i64 {
    let s = field.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return default;
    }
    match rest[..digits_len].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone, Utc};

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn normalize(fields: &[&str], window: &DateWindow) -> Result<AttendanceRecord, RowRejection> {
        let offset = Utc.fix();
        let ctx = NormalizeContext {
            serial_number: "SN001",
            window,
            utc_offset: &offset,
        };
        normalize_row(&row(fields), &ctx)
    }

    #[test]
    fn test_parse_int_field() {
        assert_eq!(parse_int_field("3abc", 1), 3);
        assert_eq!(parse_int_field(" 15 ", 1), 15);
        assert_eq!(parse_int_field("-2", 0), -2);
        assert_eq!(parse_int_field("0", 1), 0);
        assert_eq!(parse_int_field("", 1), 1);
        assert_eq!(parse_int_field("x", 0), 0);
        assert_eq!(parse_int_field("-", 1), 1);
        assert_eq!(parse_int_field("99999999999999999999", 1), 1);
    }

    #[test]
    fn test_valid_row() {
        let record = normalize(
            &["101", "2024-01-05 08:00:00", "1", "0", "1", "extra"],
            &DateWindow::unbounded(),
        )
        .unwrap();
        assert_eq!(record.serial_number, "SN001");
        assert_eq!(record.employee_code, "101");
        assert_eq!(record.punch_time, Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap());
        assert_eq!((record.verify_type, record.status, record.work_code), (1, 0, 1));
        assert!(Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn test_default_substitution() {
        let record = normalize(
            &["101", "2024-01-05 08:00:00", "abc", "", "n/a"],
            &DateWindow::unbounded(),
        )
        .unwrap();
        assert_eq!(
            (record.verify_type, record.status, record.work_code),
            (DEFAULT_VERIFY_TYPE, DEFAULT_STATUS, DEFAULT_WORK_CODE)
        );
    }

    #[test]
    fn test_rejections() {
        let all = DateWindow::unbounded();
        assert_eq!(
            normalize(&["101", "2024-01-05"], &all),
            Err(RowRejection::TooFewFields(2))
        );
        assert_eq!(
            normalize(&["", "2024-01-05", "1", "0", "1"], &all),
            Err(RowRejection::EmptyCode)
        );
        assert!(matches!(
            normalize(&["EmpCode", "PunchTime", "Verify", "Status", "WorkCode"], &all),
            Err(RowRejection::HeaderRow(_))
        ));
        assert!(matches!(
            normalize(&["A12", "2024-01-05 08:00:00", "1", "0", "1"], &all),
            Err(RowRejection::NonNumericCode(_))
        ));
        assert_eq!(
            normalize(&["101", "soon", "1", "0", "1"], &all),
            Err(RowRejection::BadTimestamp("soon".into()))
        );
    }

    #[test]
    fn test_window_applied() {
        let window = DateWindow::new(
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()),
        );
        assert!(normalize(&["101", "2024-01-31 23:59:59", "1", "0", "1"], &window).is_ok());
        assert!(matches!(
            normalize(&["101", "2024-02-01 00:00:00", "1", "0", "1"], &window),
            Err(RowRejection::OutsideWindow(_))
        ));
    }

    #[test]
    fn test_epoch_punch_time() {
        let record = normalize(&["7", "1704441600", "15", "1", "0"], &DateWindow::unbounded()).unwrap();
        assert_eq!(record.punch_time, Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap());
        assert_eq!(record.verify_type, 15);
    }
}
