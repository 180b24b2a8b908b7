use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

/// Outcome codes of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Status {
    Cleaned = 0,
    NoIbanColumn = 1, // Nothing written, not a failure
}

/// Error codes reported in the JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ErrorType {
    Process = 0, // Unhandled exception
    Format = 1,  // Input is not readable tabular data
    Write = 2,   // Could not produce the cleaned file
    Config = 3,  // Bad configuration
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl ErrorType {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorType::Process => "Unhandled exception",
            ErrorType::Format => "Could not read the file as a spreadsheet",
            ErrorType::Write => "Could not write the cleaned spreadsheet",
            ErrorType::Config => "Configuration error",
        }
    }
}

/// Constants
pub mod constants {
    /// Characters removed from an account number before validation
    pub const IBAN_SEPARATORS: [char; 3] = [' ', '-', '.'];

    pub const BE_COUNTRY_CODE: &str = "BE";

    /// `BE` + 2 check digits + 12 account digits
    pub const BE_IBAN_LENGTH: usize = 16;

    /// Loose pattern used only to locate the account number column
    pub const IBAN_SURFACE_PATTERN: &str = r"^BE\d{2}[-. ]?\d{4}[-. ]?\d{4}[-. ]?\d{4}";

    pub const IBAN_TOKEN_PATTERN: &str = r"BE\d{2}[-. ]?\d{4}[-. ]?\d{4}[-. ]?\d{4}";

    pub const NO_IBAN_COLUMN_MESSAGE: &str = "No column with Belgian IBANs found.";

    pub const DEFAULT_SUFFIX: &str = "_cleaned";
    pub const DEFAULT_CONFIG_FILE: &str = "/etc/ibancleaner.conf";

    /// Header name for blank header cells, followed by the 0-based column index
    pub const UNNAMED_COLUMN_PREFIX: &str = "Unnamed: ";

    /// Number format applied to date/time cells in xlsx output
    pub const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

    pub const MAX_SCAN_LINES: usize = 1000;
    pub const FIELD_DELIM_PERCENT: usize = 50;
    pub const CHARSET_GUESS_SIZE: usize = 5120; // 5KB threshold for quick charset guess

    /// Candidate field delimiters in priority order
    pub const FIELD_DELIMS: [char; 4] = [',', ';', '\t', '|'];

    pub const DEFAULT_FIELD_DELIM: char = ',';

    /// Zip container (xlsx, xlsm, xlsb, ods)
    pub const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

    /// OLE compound document (legacy xls)
    pub const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
}
