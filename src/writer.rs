use crate::error::{IbanCleanerError, Result};
use crate::table::{Cell, Table};
use crate::types::constants::DATETIME_NUM_FORMAT;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

/// Encoding used for the cleaned file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv { delimiter: char },
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv { .. } => "csv",
        }
    }
}

/// Encode a table as a spreadsheet byte stream
pub fn write_table(table: &Table, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Xlsx => write_xlsx(table),
        OutputFormat::Csv { delimiter } => write_csv(table, delimiter),
    }
}

fn write_xlsx(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let datetime_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);
    let worksheet = workbook.add_worksheet();

    for (col_idx, name) in table.columns().iter().enumerate() {
        worksheet.write_string(0, col_num(col_idx)?, name)?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        // Row 0 is the header
        let r = row_num(row_idx + 1)?;
        for (col_idx, cell) in row.iter().enumerate() {
            let c = col_num(col_idx)?;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) | Cell::Error(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Cell::Int(i) => {
                    worksheet.write_number(r, c, *i as f64)?;
                }
                Cell::Float(f) => {
                    worksheet.write_number(r, c, *f)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                Cell::DateTime(serial) => {
                    worksheet.write_number_with_format(r, c, *serial, &datetime_format)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_csv(table: &Table, delimiter: char) -> Result<Vec<u8>> {
    let to_write_error = |e: csv::Error| IbanCleanerError::Write(e.to_string());

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_writer(Vec::new());

    writer.write_record(table.columns()).map_err(to_write_error)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(Cell::to_text))
            .map_err(to_write_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| IbanCleanerError::Write(e.to_string()))
}

fn row_num(idx: usize) -> Result<RowNum> {
    RowNum::try_from(idx)
        .map_err(|_| IbanCleanerError::Write(format!("Row {} is out of range", idx)))
}

fn col_num(idx: usize) -> Result<ColNum> {
    ColNum::try_from(idx)
        .map_err(|_| IbanCleanerError::Write(format!("Column {} is out of range", idx)))
}
