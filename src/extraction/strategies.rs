//! Candidate-row strategies.
//!
//! Each strategy reads the whole payload independently and proposes rows of
//! at least [`MIN_FIELDS`] fields. None of them validates content; that is
//! left to normalization, so overlap between strategies is expected.

use lazy_static::lazy_static;
use regex::Regex;

use super::markup::{breaks_to_newlines, preformatted_blocks, row_cells, table_rows, visible_text};

/// Fields needed for empCode, punchTime, verifyType, status, workCode.
pub const MIN_FIELDS: usize = 5;

lazy_static! {
    static ref DATE_TOKEN: Regex = Regex::new(r"^\d{1,4}[-/]\d{1,2}[-/]\d{1,4}$").unwrap();
    static ref CLOCK_TOKEN: Regex = Regex::new(r"^\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?$").unwrap();
    static ref MERIDIEM_TOKEN: Regex = Regex::new(r"(?i)^[ap]m$").unwrap();
}

/// Ordered fields proposed by one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidateRow {
    pub fields: Vec<String>,
    pub strategy: &'static str,
}

impl RawCandidateRow {
    fn new(fields: Vec<String>, strategy: &'static str) -> Self {
        Self { fields, strategy }
    }
}

/// Produces candidate rows from raw payload text.
pub trait CandidateStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn candidates(&self, payload: &str) -> Vec<RawCandidateRow>;
}

/// Tab-separated lines inside `<pre>`-like blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreformattedBlocks;

impl CandidateStrategy for PreformattedBlocks {
    fn name(&self) -> &'static str {
        "preformatted"
    }

    fn candidates(&self, payload: &str) -> Vec<RawCandidateRow> {
        let mut rows = Vec::new();
        for block in preformatted_blocks(payload) {
            let block = breaks_to_newlines(block);
            for line in block.lines() {
                let fields: Vec<String> = line.split('\t').map(visible_text).collect();
                if fields.len() >= MIN_FIELDS {
                    rows.push(RawCandidateRow::new(fields, self.name()));
                }
            }
        }
        rows
    }
}

/// Every line of the payload, split on tabs and on whitespace runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawLines;

impl CandidateStrategy for RawLines {
    fn name(&self) -> &'static str {
        "raw_lines"
    }

    fn candidates(&self, payload: &str) -> Vec<RawCandidateRow> {
        let text = breaks_to_newlines(payload);
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = visible_text(line);
            if line.is_empty() {
                continue;
            }

            if line.contains('\t') {
                let fields: Vec<String> = line.split('\t').map(|f| f.trim().to_string()).collect();
                if fields.len() >= MIN_FIELDS {
                    rows.push(RawCandidateRow::new(fields, self.name()));
                }
            }

            let fields = whitespace_fields(&line);
            if fields.len() >= MIN_FIELDS {
                rows.push(RawCandidateRow::new(fields, self.name()));
            }
        }
        rows
    }
}

/// `<td>` cells of every `<tr>` row; empty cells are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRows;

impl CandidateStrategy for TableRows {
    fn name(&self) -> &'static str {
        "table"
    }

    fn candidates(&self, payload: &str) -> Vec<RawCandidateRow> {
        table_rows(payload)
            .into_iter()
            .filter_map(|row| {
                let cells: Vec<String> = row_cells(row)
                    .into_iter()
                    .map(visible_text)
                    .filter(|cell| !cell.is_empty())
                    .collect();
                (cells.len() >= MIN_FIELDS).then(|| RawCandidateRow::new(cells, self.name()))
            })
            .collect()
    }
}

/// Split on whitespace runs, keeping `date clock [AM|PM]` together as one
/// timestamp field.
pub fn whitespace_fields(line: &str) -> Vec<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut fields = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if DATE_TOKEN.is_match(token) && tokens.get(i + 1).is_some_and(|t| CLOCK_TOKEN.is_match(t)) {
            let mut field = format!("{} {}", token, tokens[i + 1]);
            i += 2;
            if let Some(meridiem) = tokens.get(i).filter(|t| MERIDIEM_TOKEN.is_match(t)) {
                field.push(' ');
                field.push_str(meridiem);
                i += 1;
            }
            fields.push(field);
        } else {
            fields.push(token.to_string());
            i += 1;
        }
    }
    fields
}
