use chrono::{DateTime, FixedOffset, Offset, Utc};
use proptest::prelude::*;
use proptest::test_runner::Config;

use punchlog_core::extraction::{normalize_row, parse_int_field, NormalizeContext};
use punchlog_core::validation::DateWindow;
use punchlog_core::{AttendanceRecord, RowRejection};

fn utc() -> FixedOffset {
    Utc.fix()
}

fn normalize(fields: &[String], window: &DateWindow) -> Result<AttendanceRecord, RowRejection> {
    let offset = utc();
    let ctx = NormalizeContext {
        serial_number: "SN001",
        window,
        utc_offset: &offset,
    };
    normalize_row(fields, &ctx)
}

fn stamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn normalization_is_idempotent(
        code in "[0-9]{1,8}",
        secs in 1_000_000_001_i64..2_000_000_000_i64,
        verify in "[0-9a-z]{0,4}",
        status in "[0-9a-z]{0,4}",
        work in "[0-9a-z]{0,4}",
    ) {
        let time = stamp(secs).format("%Y-%m-%d %H:%M:%S").to_string();
        let fields = vec![code, time, verify, status, work];
        let window = DateWindow::unbounded();

        let first = normalize(&fields, &window).unwrap();
        let second = normalize(&fields, &window).unwrap();
        prop_assert_ne!(&first.id, &second.id);
        prop_assert_eq!(
            (first.employee_code, first.punch_time, first.verify_type, first.status, first.work_code),
            (second.employee_code, second.punch_time, second.verify_type, second.status, second.work_code)
        );
    }

    #[test]
    fn surviving_codes_are_numeric(code in "\\PC{0,12}") {
        let fields = vec![
            code,
            "2024-01-05 08:00:00".to_string(),
            "1".to_string(),
            "0".to_string(),
            "1".to_string(),
        ];
        if let Ok(record) = normalize(&fields, &DateWindow::unbounded()) {
            prop_assert!(!record.employee_code.is_empty());
            prop_assert!(record.employee_code.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn leading_integer_wins(n in any::<i32>(), suffix in "[a-z/]{0,5}") {
        prop_assert_eq!(parse_int_field(&format!("{}{}", n, suffix), 7), i64::from(n));
    }

    #[test]
    fn window_bounds_are_inclusive(
        start in 1_000_000_000_i64..1_500_000_000_i64,
        len in 0_i64..100_000_000_i64,
        point in 900_000_000_i64..1_700_000_000_i64,
    ) {
        let window = DateWindow::new(Some(stamp(start)), Some(stamp(start + len)));
        let expected = point >= start && point <= start + len;
        prop_assert_eq!(window.contains(&stamp(point)), expected);
    }

    #[test]
    fn epoch_strings_match_chrono(secs in 1_000_000_001_i64..4_000_000_000_i64) {
        let parsed = punchlog_core::extraction::parse_punch_time(&secs.to_string(), &utc());
        prop_assert_eq!(parsed, Some(stamp(secs)));
    }
}
