use crate::config::Config;
use crate::detection::detect_iban_column;
use crate::error::{IbanCleanerError, Result};
use crate::output::{ErrorResponse, Response, SuccessResponse};
use crate::reader::read_table;
use crate::table::{Cell, Table};
use crate::types::constants::NO_IBAN_COLUMN_MESSAGE;
use crate::validation::is_valid_iban;
use crate::writer::{write_table, OutputFormat};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, trace};

/// Row counters of one cleaning pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub checked: usize,
    pub removed: usize,
    pub kept: usize,
}

impl Summary {
    pub fn new(checked: usize, kept: usize) -> Self {
        debug_assert!(kept <= checked, "kept {} of {} rows", kept, checked);
        Summary {
            checked,
            removed: checked.saturating_sub(kept),
            kept,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows checked: {} invalid numbers removed, {} rows remaining.",
            self.checked, self.removed, self.kept
        )
    }
}

/// Result of cleaning one table
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Cleaned {
        column: String,
        table: Table,
        summary: Summary,
    },
    NoIbanColumn,
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::Cleaned { summary, .. } => summary.to_string(),
            Outcome::NoIbanColumn => NO_IBAN_COLUMN_MESSAGE.to_string(),
        }
    }

    /// The cleaned table, if any, and the status message
    pub fn into_parts(self) -> (Option<Table>, String) {
        let message = self.message();
        match self {
            Outcome::Cleaned { table, .. } => (Some(table), message),
            Outcome::NoIbanColumn => (None, message),
        }
    }
}

/// Keep only the rows whose account number is a valid Belgian IBAN.
///
/// The account number column is the first one holding an IBAN-looking value.
/// The input table is left untouched.
pub fn process(table: &Table) -> Outcome {
    let col_idx = match detect_iban_column(table) {
        Some(idx) => idx,
        None => {
            info!(rows = table.row_count(), "{}", NO_IBAN_COLUMN_MESSAGE);
            return Outcome::NoIbanColumn;
        }
    };

    let cleaned = table.filter_rows(|row| {
        let value = row.get(col_idx).map(Cell::to_text).unwrap_or_default();
        let valid = is_valid_iban(&value);
        trace!(value = %value, valid, "checked account number");
        valid
    });

    let summary = Summary::new(table.row_count(), cleaned.row_count());
    let column = table.columns()[col_idx].clone();
    info!(
        column = %column,
        checked = summary.checked,
        removed = summary.removed,
        kept = summary.kept,
        "cleaned table"
    );

    Outcome::Cleaned {
        column,
        table: cleaned,
        summary,
    }
}

/// Result of cleaning one uploaded file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Cleaned spreadsheet, absent when no IBAN column was found
    pub output: Option<Vec<u8>>,
    pub message: String,
    pub column: Option<String>,
    pub summary: Option<Summary>,
    pub format: OutputFormat,
}

/// Derive the cleaned file name: `accounts.xlsx` becomes `accounts_cleaned.xlsx`
pub fn cleaned_filename(label: &str, suffix: &str, format: OutputFormat) -> String {
    let stem = Path::new(label)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(label);

    format!("{}{}.{}", stem, suffix, format.extension())
}

/// Absolute form of a path that may not exist yet; falls back to dropping
/// `.` components when the parent directory cannot be resolved either.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }

    let lexical: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let parent = match lexical.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    match (parent.canonicalize(), lexical.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => lexical,
    }
}

/// IBAN cleaner main struct
pub struct IbanCleaner {
    config: Config,
}

impl IbanCleaner {
    pub fn new(config: Config) -> Self {
        IbanCleaner { config }
    }

    /// Clean a spreadsheet byte stream. `label` is the original file name.
    ///
    /// Unreadable input is an error. A missing IBAN column is not: the
    /// outcome then carries no output and explains why.
    pub fn process_file(&self, data: &[u8], label: &str) -> Result<FileOutcome> {
        let source = read_table(data, label, self.config.sheet.as_deref())?;

        match process(&source.table) {
            Outcome::Cleaned {
                column,
                table,
                summary,
            } => Ok(FileOutcome {
                output: Some(write_table(&table, source.output_format)?),
                message: summary.to_string(),
                column: Some(column),
                summary: Some(summary),
                format: source.output_format,
            }),
            Outcome::NoIbanColumn => Ok(FileOutcome {
                output: None,
                message: NO_IBAN_COLUMN_MESSAGE.to_string(),
                column: None,
                summary: None,
                format: source.output_format,
            }),
        }
    }

    /// Clean the configured file and write the result next to it
    pub fn run(&self) -> Response {
        match self.run_internal() {
            Ok(response) => Response::Success(response),
            Err(e) => Response::Error(self.build_error_response(e)),
        }
    }

    fn run_internal(&self) -> Result<SuccessResponse> {
        let data = fs::read(&self.config.filename)?;
        let label = Path::new(&self.config.filename)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.config.filename);

        let outcome = self.process_file(&data, label)?;

        let (output, column, summary) = match (outcome.output, outcome.column, outcome.summary)
        {
            (Some(output), Some(column), Some(summary)) => (output, column, summary),
            _ => return Ok(SuccessResponse::no_iban_column(outcome.message)),
        };

        let path = self.output_path(outcome.format)?;
        fs::write(&path, output)?;
        info!(path = %path.display(), "wrote cleaned file");

        Ok(SuccessResponse::cleaned(
            column,
            summary,
            path.display().to_string(),
        ))
    }

    /// Where the cleaned file goes. Never the input file itself.
    pub fn output_path(&self, format: OutputFormat) -> Result<PathBuf> {
        let path = match &self.config.output {
            Some(output) => PathBuf::from(output),
            None => {
                let input = Path::new(&self.config.filename);
                let dir = match &self.config.output_dir {
                    Some(dir) => PathBuf::from(dir),
                    None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
                };
                dir.join(cleaned_filename(
                    &self.config.filename,
                    &self.config.suffix,
                    format,
                ))
            }
        };

        if resolve_path(&path) == resolve_path(Path::new(&self.config.filename)) {
            return Err(IbanCleanerError::ConfigError(format!(
                "Output file {} would overwrite the input file",
                path.display()
            )));
        }

        Ok(path)
    }

    /// Build error response
    fn build_error_response(&self, error: IbanCleanerError) -> ErrorResponse {
        ErrorResponse::new(error.error_type(), self.config.filename.clone())
            .with_internal_message(error.to_string())
    }
}
