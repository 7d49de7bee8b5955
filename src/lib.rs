//! Punchlog Core - attendance-log retrieval and extraction pipeline
//!
//! Logs into a legacy session-cookie time-clock portal, pulls the
//! attendance listing page and extracts structured punch records from it.
//! The implementation prioritizes:
//!
//! 1. **Tolerance** - the listing's layout is unknown, so several
//!    extraction strategies run side by side and bad rows are skipped
//! 2. **Logging** - every step logged with fetch and device context
//! 3. **Uniform results** - every call ends in a success or failure envelope
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `transport` - portal client, login handshake, listing fetch
//! - `extraction` - candidate-row strategies, normalization, timestamps
//! - `validation` - employee-code gates and date-window filtering
//! - `pipeline` - fetch orchestration and device sync
//! - `storage` - wire models and the in-memory device registry
//! - `api` - axum HTTP surface
//! - `config` - environment-driven configuration
//! - `security` - cookie redaction for logs
//! - `logging` - structured logging with fetch context

pub mod api;
pub mod config;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod pipeline;
pub mod security;
pub mod storage;
pub mod transport;
pub mod validation;

pub use config::Config;
pub use error::{AttendanceError, RowRejection, SyncError};
pub use pipeline::attendance::{fetch_attendance, try_fetch_attendance, FetchOptions};
pub use storage::models::{AttendanceRecord, Credentials, FetchRequest, ResultEnvelope};
pub use transport::session::{AttendanceSource, PortalClient};

/// Initialize the process-wide logger. Safe to call more than once.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
