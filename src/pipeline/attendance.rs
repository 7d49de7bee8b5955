//! Fetch-and-parse orchestration.
//!
//! Sequential per invocation:
//! 1. Parse the request window
//! 2. Login handshake
//! 3. Listing fetch
//! 4. Extraction (synchronous)
//!
//! A failure in steps 1-3 short-circuits; the caller always gets an
//! envelope.

use chrono::{FixedOffset, Offset, Utc};

use crate::config::Config;
use crate::error::AttendanceError;
use crate::extraction::extractor::{ExtractOptions, RecordExtractor};
use crate::log_error;
use crate::storage::models::{AttendanceRecord, FetchRequest, ResultEnvelope};
use crate::transport::session::AttendanceSource;
use crate::validation::window::DateWindow;

use super::context::FetchContext;

/// Settings shared by every fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub utc_offset: FixedOffset,
    pub dedupe: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            dedupe: true,
        }
    }
}

impl From<&Config> for FetchOptions {
    fn from(config: &Config) -> Self {
        Self {
            utc_offset: config.device_utc_offset,
            dedupe: config.dedupe,
        }
    }
}

/// Fetch and parse attendance for one device, wrapped in an envelope.
pub async fn fetch_attendance<S: AttendanceSource>(
    source: &S,
    request: &FetchRequest,
    options: &FetchOptions,
) -> ResultEnvelope {
    match try_fetch_attendance(source, request, options).await {
        Ok(records) => ResultEnvelope::success(records),
        Err(e) => ResultEnvelope::failure(&e.to_string()),
    }
}

/// Same as [`fetch_attendance`] but keeps the error typed, for callers that
/// need to tell a bad request from an upstream failure.
pub async fn try_fetch_attendance<S: AttendanceSource>(
    source: &S,
    request: &FetchRequest,
    options: &FetchOptions,
) -> Result<Vec<AttendanceRecord>, AttendanceError> {
    let fetch = FetchContext::new(&request.sn);
    let ctx = fetch.log_context();

    log::info!(
        "{} FETCH_START start_date={:?} end_date={:?}",
        ctx,
        request.start_date,
        request.end_date
    );

    let result = async {
        let window = DateWindow::from_request(
            request.start_date.as_deref(),
            request.end_date.as_deref(),
            &options.utc_offset,
        )?;

        log::info!("{} LOGIN_START", ctx);
        let cookie = source.authenticate(&request.credentials(), &ctx).await?;
        let payload = source.fetch_payload(&cookie, &ctx).await?;

        let extract_options = ExtractOptions {
            window,
            utc_offset: options.utc_offset,
            dedupe: options.dedupe,
        };
        let outcome = RecordExtractor::default().extract(&payload, &request.sn, &extract_options, &ctx);
        Ok::<_, AttendanceError>(outcome.records)
    }
    .await;

    match &result {
        Ok(records) => log::info!(
            "{} FETCH_COMPLETE count={} elapsed_ms={}",
            ctx,
            records.len(),
            fetch.elapsed_ms()
        ),
        Err(e) => {
            log_error!(
                ctx,
                "FETCH_FAILED",
                kind = e.kind(),
                phase = e.phase(),
                error = e.to_string(),
                elapsed_ms = fetch.elapsed_ms(),
            );
        }
    }
    result
}
