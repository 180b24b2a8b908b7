use crate::table::Table;
use crate::types::constants::{IBAN_SURFACE_PATTERN, IBAN_TOKEN_PATTERN};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Loose Belgian IBAN shape, separators optional per group
static IBAN_SURFACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(IBAN_SURFACE_PATTERN).unwrap());

/// Same shape, anywhere in a line of text
static IBAN_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(IBAN_TOKEN_PATTERN).unwrap());

/// Check if a value looks like a Belgian IBAN (no checksum involved)
pub fn looks_like_iban(value: &str) -> bool {
    IBAN_SURFACE_REGEX.is_match(value)
}

/// Byte ranges of IBAN-looking tokens inside a line
pub fn find_iban_tokens(line: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    IBAN_TOKEN_REGEX.find_iter(line).map(|m| (m.start(), m.end()))
}

/// Find the first column, in column order, holding at least one
/// IBAN-looking value. Returns its 0-based index.
pub fn detect_iban_column(table: &Table) -> Option<usize> {
    for (col_idx, name) in table.columns().iter().enumerate() {
        if table.column_texts(col_idx).any(|v| looks_like_iban(&v)) {
            debug!(column = %name, index = col_idx, "IBAN column detected");
            return Some(col_idx);
        }
    }

    debug!(columns = table.columns().len(), "no IBAN column detected");
    None
}
