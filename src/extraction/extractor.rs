//! Record extraction over every registered strategy.

use std::collections::HashSet;

use chrono::{FixedOffset, Offset, Utc};

use crate::logging::structured::LogContext;
use crate::storage::codes::{punch_status, verify_type};
use crate::storage::models::AttendanceRecord;
use crate::validation::window::DateWindow;
use crate::{log_debug, log_info, log_warn};

use super::normalize::{normalize_row, NormalizeContext};
use super::strategies::{CandidateStrategy, PreformattedBlocks, RawCandidateRow, RawLines, TableRows};

/// Per-fetch extraction settings.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub window: DateWindow,
    pub utc_offset: FixedOffset,
    /// Collapse records sharing `(employee_code, punch_time)`.
    pub dedupe: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            window: DateWindow::unbounded(),
            utc_offset: Utc.fix(),
            dedupe: true,
        }
    }
}

/// Records plus the bookkeeping counters of one extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub records: Vec<AttendanceRecord>,
    pub candidates: usize,
    pub rejected: usize,
    pub duplicates: usize,
}

/// Runs every strategy over a payload and normalizes the union.
pub struct RecordExtractor {
    strategies: Vec<Box<dyn CandidateStrategy>>,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::with_strategies(vec![
            Box::new(PreformattedBlocks),
            Box::new(RawLines),
            Box::new(TableRows),
        ])
    }
}

impl RecordExtractor {
    pub fn with_strategies(strategies: Vec<Box<dyn CandidateStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Union of every strategy's candidates, in strategy order.
    pub fn candidates(&self, payload: &str) -> Vec<RawCandidateRow> {
        self.strategies
            .iter()
            .flat_map(|strategy| strategy.candidates(payload))
            .collect()
    }

    /// Extract the records of `payload` for device `serial_number`.
    ///
    /// Rejected rows are logged at debug level and counted; they never
    /// abort extraction.
    pub fn extract(
        &self,
        payload: &str,
        serial_number: &str,
        options: &ExtractOptions,
        ctx: &LogContext,
    ) -> ExtractionOutcome {
        let norm_ctx = NormalizeContext {
            serial_number,
            window: &options.window,
            utc_offset: &options.utc_offset,
        };

        let candidates = self.candidates(payload);
        if candidates.is_empty() && !payload.trim().is_empty() {
            log_warn!(ctx, "EXTRACT_NO_CANDIDATES", payload_bytes = payload.len());
        }
        let mut outcome = ExtractionOutcome {
            candidates: candidates.len(),
            ..Default::default()
        };
        let mut seen = HashSet::new();

        for candidate in &candidates {
            match normalize_row(&candidate.fields, &norm_ctx) {
                Ok(record) => {
                    if options.dedupe && !seen.insert(record.content_key()) {
                        outcome.duplicates += 1;
                        continue;
                    }
                    log_debug!(
                        ctx,
                        "ROW_ACCEPTED",
                        strategy = candidate.strategy,
                        emp = record.employee_code,
                        verify = verify_type::name(record.verify_type),
                        status = punch_status::name(record.status),
                    );
                    outcome.records.push(record);
                }
                Err(rejection) => {
                    outcome.rejected += 1;
                    log_debug!(
                        ctx,
                        "ROW_REJECTED",
                        strategy = candidate.strategy,
                        reason = rejection.as_str(),
                        detail = rejection.to_string(),
                    );
                }
            }
        }

        log_info!(
            ctx,
            "EXTRACT_COMPLETE",
            candidates = outcome.candidates,
            records = outcome.records.len(),
            rejected = outcome.rejected,
            duplicates = outcome.duplicates,
        );
        outcome
    }
}
