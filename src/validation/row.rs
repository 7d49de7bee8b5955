//! Employee-code gates applied to the first field of a candidate row.

use crate::error::RowRejection;

const HEADER_MARKERS: &[&str] = &["emp", "code", "id"];

/// True when the field looks like a column caption (`EmpCode`, `ID`, ...).
pub fn is_header_field(field: &str) -> bool {
    let lower = field.to_ascii_lowercase();
    HEADER_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Validate the employee-code field and return it trimmed.
///
/// Empty, header-like or non-numeric codes reject the row.
pub fn check_employee_code(field: &str) -> Result<String, RowRejection> {
    let code = field.trim();
    if code.is_empty() {
        return Err(RowRejection::EmptyCode);
    }
    if is_header_field(code) {
        return Err(RowRejection::HeaderRow(code.to_string()));
    }
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RowRejection::NonNumericCode(code.to_string()));
    }
    Ok(code.to_string())
}
