use crate::detection::iban::find_iban_tokens;
use crate::types::constants::{DEFAULT_FIELD_DELIM, FIELD_DELIMS, FIELD_DELIM_PERCENT};

/// Characters skipped when looking for the delimiter next to an account number
const PADDING: [char; 2] = [' ', '"'];

/// Detect the field delimiter in delimited text lines.
/// Uses the characters around account numbers first, falling back to
/// frequency, and finally to a comma.
pub fn detect_delimiter(lines: &[&str]) -> char {
    lines
        .iter()
        .find_map(|line| get_iban_delimiter(line))
        .or_else(|| detect_delimiter_by_frequency(lines))
        .unwrap_or(DEFAULT_FIELD_DELIM)
}

/// Find a delimiter adjacent to an IBAN-looking token in a line
fn get_iban_delimiter(line: &str) -> Option<char> {
    for (start, end) in find_iban_tokens(line) {
        let right_delim = line[end..]
            .chars()
            .find(|c| !PADDING.contains(c))
            .filter(|&c| is_field_delimiter(c));

        let left_delim = line[..start]
            .chars()
            .rev()
            .find(|c| !PADDING.contains(c))
            .filter(|&c| is_field_delimiter(c));

        match (left_delim, right_delim) {
            (Some(l), Some(r)) if l == r => return Some(l),
            (Some(l), Some(r)) => return Some(get_priority_delimiter(l, r)),
            (None, Some(r)) => return Some(r),
            (Some(l), None) => return Some(l),
            (None, None) => {}
        }
    }

    None
}

/// Check if character is a valid field delimiter
fn is_field_delimiter(c: char) -> bool {
    FIELD_DELIMS.contains(&c)
}

/// Get the delimiter with higher priority
fn get_priority_delimiter(c1: char, c2: char) -> char {
    FIELD_DELIMS
        .iter()
        .copied()
        .find(|&d| d == c1 || d == c2)
        .unwrap_or(c1)
}

/// Detect delimiter by counting frequencies across lines
fn detect_delimiter_by_frequency(lines: &[&str]) -> Option<char> {
    if lines.is_empty() {
        return None;
    }

    // (delimiter, total_count, lines_present)
    let mut delim_stats: Vec<(char, usize, usize)> =
        FIELD_DELIMS.iter().map(|&d| (d, 0, 0)).collect();

    for line in lines {
        for stat in delim_stats.iter_mut() {
            let count = count_delimiters(stat.0, line);
            stat.1 += count;
            if count > 0 {
                stat.2 += 1;
            }
        }
    }

    // Highest count wins, earlier candidates win ties
    let best = delim_stats
        .iter()
        .filter(|stat| stat.1 > 0)
        .fold(None::<&(char, usize, usize)>, |best, stat| match best {
            Some(b) if b.1 >= stat.1 => Some(b),
            _ => Some(stat),
        })?;

    // Winner must appear in at least FIELD_DELIM_PERCENT of lines
    if (best.2 * 100) / lines.len() >= FIELD_DELIM_PERCENT {
        Some(best.0)
    } else {
        None
    }
}

/// Count occurrences of a delimiter in a line, ignoring quoted text
pub fn count_delimiters(delimiter: char, line: &str) -> usize {
    let mut count = 0;
    let mut inside_text = false;

    for c in line.chars() {
        if c == '"' {
            inside_text = !inside_text;
        } else if c == delimiter && !inside_text {
            count += 1;
        }
    }

    count
}
