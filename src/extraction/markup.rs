//! Tolerant markup scanning.
//!
//! No DOM is built. Segments are located with case-insensitive tag
//! patterns; an element runs until its closing tag, or until the next
//! opening tag of the same kind when the portal forgets to close it.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Any markup tag
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();

    /// Line break tags
    static ref BREAK: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();

    /// Blocks whose text keeps its own line and tab layout
    static ref PRE_OPEN: Regex = Regex::new(r"(?i)<(?:pre|xmp|textarea)\b[^>]*>").unwrap();
    static ref PRE_CLOSE: Regex = Regex::new(r"(?i)</(?:pre|xmp|textarea)\s*>").unwrap();

    static ref ROW_OPEN: Regex = Regex::new(r"(?i)<tr\b[^>]*>").unwrap();
    static ref ROW_CLOSE: Regex = Regex::new(r"(?i)</tr\s*>").unwrap();

    static ref CELL_OPEN: Regex = Regex::new(r"(?i)<td\b[^>]*>").unwrap();
    static ref CELL_CLOSE: Regex = Regex::new(r"(?i)</td\s*>").unwrap();
}

/// Inner text of every element opened by `open`.
///
/// Each segment ends at the first `close` match, else at the next `open`
/// match, else at the end of `text`.
fn segments<'a>(text: &'a str, open: &Regex, close: &Regex) -> Vec<&'a str> {
    let opens: Vec<_> = open.find_iter(text).collect();
    opens
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let limit = opens.get(i + 1).map(|next| next.start()).unwrap_or(text.len());
            let body = &text[m.end()..limit];
            match close.find(body) {
                Some(c) => &body[..c.start()],
                None => body,
            }
        })
        .collect()
}

/// Contents of `<pre>`-like blocks.
pub fn preformatted_blocks(payload: &str) -> Vec<&str> {
    segments(payload, &PRE_OPEN, &PRE_CLOSE)
}

/// Contents of `<tr>` rows.
pub fn table_rows(payload: &str) -> Vec<&str> {
    segments(payload, &ROW_OPEN, &ROW_CLOSE)
}

/// Raw (still marked-up) contents of the `<td>` cells of one row.
pub fn row_cells(row: &str) -> Vec<&str> {
    segments(row, &CELL_OPEN, &CELL_CLOSE)
}

/// Turn `<br>` tags into newlines so line splitting sees them.
pub fn breaks_to_newlines(s: &str) -> String {
    BREAK.replace_all(s, "\n").into_owned()
}

/// Remove all tags `<...>` without collapsing whitespace.
pub fn strip_tags(s: &str) -> String {
    TAG.replace_all(s, "").into_owned()
}

/// Decode the handful of entities the portal emits.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Visible text of a fragment: tags stripped, entities decoded, trimmed.
pub fn visible_text(s: &str) -> String {
    decode_entities(&strip_tags(s)).trim().to_string()
}
