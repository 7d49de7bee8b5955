//! Labels for the integer enumerations carried on attendance records.
//!
//! Records keep the raw device codes; these helpers exist for display and
//! log output only.

/// Verification method codes reported by the time clock.
pub mod verify_type {
    pub const PASSWORD: i64 = 0;
    pub const FINGERPRINT: i64 = 1;
    pub const CARD: i64 = 2;
    pub const FINGERPRINT_PASSWORD: i64 = 3;
    pub const FINGERPRINT_CARD: i64 = 4;
    pub const PASSWORD_CARD: i64 = 5;
    pub const FINGERPRINT_PASSWORD_CARD: i64 = 6;
    pub const FACE: i64 = 15;

    /// Get human-readable name for verify type code.
    pub fn name(code: i64) -> &'static str {
        match code {
            PASSWORD => "password",
            FINGERPRINT => "fingerprint",
            CARD => "card",
            FINGERPRINT_PASSWORD => "fingerprint+password",
            FINGERPRINT_CARD => "fingerprint+card",
            PASSWORD_CARD => "password+card",
            FINGERPRINT_PASSWORD_CARD => "fingerprint+password+card",
            FACE => "face",
            _ => "unknown",
        }
    }
}

/// Punch semantics codes.
pub mod punch_status {
    pub const CHECK_IN: i64 = 0;
    pub const CHECK_OUT: i64 = 1;
    pub const BREAK_OUT: i64 = 2;
    pub const BREAK_IN: i64 = 3;
    pub const OVERTIME_IN: i64 = 4;
    pub const OVERTIME_OUT: i64 = 5;

    pub fn name(code: i64) -> &'static str {
        match code {
            CHECK_IN => "check-in",
            CHECK_OUT => "check-out",
            BREAK_OUT => "break-out",
            BREAK_IN => "break-in",
            OVERTIME_IN => "overtime-in",
            OVERTIME_OUT => "overtime-out",
            _ => "unknown",
        }
    }
}
