use crate::detection::{decode_text, detect_delimiter};
use crate::error::{IbanCleanerError, Result};
use crate::table::{Cell, Table};
use crate::types::constants::{MAX_SCAN_LINES, OLE_MAGIC, UNNAMED_COLUMN_PREFIX, ZIP_MAGIC};
use crate::writer::OutputFormat;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Kind of spreadsheet found in an input byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// xlsx, xlsm, xlsb, xls or ods
    Workbook,
    /// Delimited text
    Delimited,
}

impl InputFormat {
    /// Detect the format from magic bytes, then from the label's extension.
    pub fn detect(data: &[u8], label: &str) -> Result<Self> {
        if data.starts_with(ZIP_MAGIC) || data.starts_with(OLE_MAGIC) {
            return Ok(InputFormat::Workbook);
        }

        let extension = Path::new(label)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(InputFormat::Workbook),
            // Text extensions are sniffed too
            _ if is_binary_data(data) => Err(IbanCleanerError::Format(format!(
                "{} is not a spreadsheet",
                label
            ))),
            _ => Ok(InputFormat::Delimited),
        }
    }
}

/// A decoded input file and the format its cleaned version is written in
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub table: Table,
    pub output_format: OutputFormat,
}

/// Decode a spreadsheet byte stream. The first row holds the column names.
pub fn read_table(data: &[u8], label: &str, sheet: Option<&str>) -> Result<SourceTable> {
    if data.is_empty() {
        return Err(IbanCleanerError::Format(format!("{} is empty", label)));
    }

    match InputFormat::detect(data, label)? {
        InputFormat::Workbook => Ok(SourceTable {
            table: read_workbook(data, sheet)?,
            output_format: OutputFormat::Xlsx,
        }),
        InputFormat::Delimited => {
            let (table, delimiter) = read_delimited(data)?;
            Ok(SourceTable {
                table,
                output_format: OutputFormat::Csv { delimiter },
            })
        }
    }
}

fn read_workbook(data: &[u8], sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let target_sheet = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(IbanCleanerError::Format(format!(
                    "Sheet '{}' not found. Available: {}",
                    name,
                    sheet_names.join(", ")
                )));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IbanCleanerError::Format("Workbook has no sheets".to_string()))?,
    };

    let range = workbook.worksheet_range(&target_sheet)?;
    debug!(sheet = %target_sheet, height = range.height(), width = range.width(), "read sheet");

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect::<Vec<Cell>>());

    let header = rows
        .next()
        .ok_or_else(|| IbanCleanerError::Format(format!("Sheet '{}' is empty", target_sheet)))?;
    let columns = column_names(header.iter().map(Cell::to_text))?;

    Ok(Table::new(columns, rows.collect()))
}

fn read_delimited(data: &[u8]) -> Result<(Table, char)> {
    let text = decode_text(data)?;

    let lines: Vec<&str> = text.lines().take(MAX_SCAN_LINES).collect();
    if lines.iter().all(|line| line.trim().is_empty()) {
        return Err(IbanCleanerError::Format("File has no content".to_string()));
    }

    let delimiter = detect_delimiter(&lines);
    debug!(delimiter = ?delimiter, "detected field delimiter");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = column_names(reader.headers()?.iter().map(str::to_string))?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            IbanCleanerError::Format(format!("Failed to parse row {}: {}", idx + 2, e))
        })?;
        rows.push(record.iter().map(Cell::from).collect());
    }

    Ok((Table::new(columns, rows), delimiter))
}

/// Header names, blank ones replaced by `Unnamed: <index>`
fn column_names<I>(header: I) -> Result<Vec<String>>
where
    I: Iterator<Item = String>,
{
    let names: Vec<String> = header
        .enumerate()
        .map(|(idx, name)| {
            if name.trim().is_empty() {
                format!("{}{}", UNNAMED_COLUMN_PREFIX, idx)
            } else {
                name
            }
        })
        .collect();

    if names.iter().all(|n| n.starts_with(UNNAMED_COLUMN_PREFIX)) {
        return Err(IbanCleanerError::Format(
            "Header row has no column names".to_string(),
        ));
    }

    Ok(names)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Float(*f),
        Data::Int(i) => Cell::Int(*i),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

/// Check if data appears to be binary rather than text
pub fn is_binary_data(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }

    // Check first line only
    let first_line_end = data
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(data.len())
        .min(1024);

    let sample = &data[..first_line_end];

    // Skip BOM checks
    let sample = if sample.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &sample[3..]
    } else if sample.starts_with(&[0xFF, 0xFE]) || sample.starts_with(&[0xFE, 0xFF]) {
        // UTF-16 text is full of NUL bytes
        return false;
    } else {
        sample
    };

    if sample.is_empty() {
        return false;
    }

    // Control characters other than tab and carriage return
    let unprintable_count = sample
        .iter()
        .filter(|&&b| (b < 0x20 && b != b'\t' && b != b'\r') || b == 0x7F)
        .count();

    // If more than 20% unprintable, consider binary
    (unprintable_count * 100) / sample.len() >= 20
}
