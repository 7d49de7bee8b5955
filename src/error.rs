//! Error taxonomy for the attendance pipeline.
//!
//! `AttendanceError` is fatal for an invocation and always ends up as a
//! failure envelope. `RowRejection` is per candidate row and never leaves
//! the extractor.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Which upstream request a transport failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoginPage,
    LoginSubmit,
    Listing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::LoginPage => "login_page",
            Stage::LoginSubmit => "login_submit",
            Stage::Listing => "listing",
        }
    }

    fn is_login(&self) -> bool {
        matches!(self, Stage::LoginPage | Stage::LoginSubmit)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal failure of one attendance fetch.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Login failed with status: {0}")]
    AuthRejected(u16),

    #[error("Login timed out after {0:?}")]
    AuthTimeout(Duration),

    #[error("Data fetch failed with status: {0}")]
    FetchRejected(u16),

    #[error("Data fetch timed out after {0:?}")]
    FetchTimeout(Duration),

    #[error("{source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AttendanceError {
    /// Map a reqwest error from `stage`, folding timeouts into the
    /// auth/fetch timeout variants.
    pub fn from_transport(stage: Stage, source: reqwest::Error, timeout: Duration) -> Self {
        if source.is_timeout() {
            if stage.is_login() {
                AttendanceError::AuthTimeout(timeout)
            } else {
                AttendanceError::FetchTimeout(timeout)
            }
        } else {
            AttendanceError::Transport { stage, source }
        }
    }

    /// Login handshake failures (status or timeout, or transport during login).
    pub fn is_auth(&self) -> bool {
        match self {
            AttendanceError::AuthRejected(_) | AttendanceError::AuthTimeout(_) => true,
            AttendanceError::Transport { stage, .. } => stage.is_login(),
            _ => false,
        }
    }

    /// Listing request failures.
    pub fn is_fetch(&self) -> bool {
        match self {
            AttendanceError::FetchRejected(_) | AttendanceError::FetchTimeout(_) => true,
            AttendanceError::Transport { stage, .. } => !stage.is_login(),
            _ => false,
        }
    }

    /// Which step of the fetch failed, for log lines.
    pub fn phase(&self) -> &'static str {
        if self.is_auth() {
            "login"
        } else if self.is_fetch() {
            "listing"
        } else {
            "request"
        }
    }

    /// Short machine-readable kind for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            AttendanceError::AuthRejected(_) | AttendanceError::AuthTimeout(_) => "auth",
            AttendanceError::FetchRejected(_) | AttendanceError::FetchTimeout(_) => "fetch",
            AttendanceError::Transport { .. } => "transport",
            AttendanceError::InvalidRequest(_) => "invalid_request",
        }
    }
}

/// Why a single candidate row did not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("row has {0} fields, need at least 5")]
    TooFewFields(usize),

    #[error("employee code is empty")]
    EmptyCode,

    #[error("header row: {0:?}")]
    HeaderRow(String),

    #[error("employee code is not numeric: {0:?}")]
    NonNumericCode(String),

    #[error("unparseable punch time: {0:?}")]
    BadTimestamp(String),

    #[error("punch time {0} outside date window")]
    OutsideWindow(String),
}

impl RowRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowRejection::TooFewFields(_) => "too_few_fields",
            RowRejection::EmptyCode => "empty_code",
            RowRejection::HeaderRow(_) => "header_row",
            RowRejection::NonNumericCode(_) => "non_numeric_code",
            RowRejection::BadTimestamp(_) => "bad_timestamp",
            RowRejection::OutsideWindow(_) => "outside_window",
        }
    }
}

/// Failure of a registry-driven device sync.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("unknown device: {0}")]
    UnknownDevice(String),

    #[error("{0}")]
    Fetch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(
            AttendanceError::AuthRejected(403).to_string(),
            "Login failed with status: 403"
        );
        assert_eq!(
            AttendanceError::FetchRejected(500).to_string(),
            "Data fetch failed with status: 500"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(AttendanceError::AuthRejected(401).is_auth());
        assert!(!AttendanceError::AuthRejected(401).is_fetch());
        assert!(AttendanceError::FetchTimeout(Duration::from_secs(1)).is_fetch());
        assert!(!AttendanceError::InvalidRequest("x".into()).is_auth());
        assert_eq!(AttendanceError::InvalidRequest("x".into()).kind(), "invalid_request");
    }

    #[test]
    fn test_phase_follows_classification() {
        assert_eq!(AttendanceError::AuthTimeout(Duration::from_secs(1)).phase(), "login");
        assert_eq!(AttendanceError::FetchRejected(500).phase(), "listing");
        assert_eq!(AttendanceError::InvalidRequest("x".into()).phase(), "request");
    }

    #[test]
    fn test_rejection_labels() {
        assert_eq!(RowRejection::EmptyCode.as_str(), "empty_code");
        assert_eq!(
            RowRejection::HeaderRow("EmpCode".into()).as_str(),
            "header_row"
        );
    }

    #[test]
    fn test_sync_error_messages() {
        assert_eq!(SyncError::UnknownDevice("d1".into()).to_string(), "unknown device: d1");
        assert_eq!(
            SyncError::Fetch("Login failed with status: 401".into()).to_string(),
            "Login failed with status: 401"
        );
    }
}
