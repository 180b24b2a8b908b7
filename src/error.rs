use crate::types::ErrorType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IbanCleanerError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl IbanCleanerError {
    pub fn error_type(&self) -> ErrorType {
        match self {
            IbanCleanerError::Format(_) => ErrorType::Format,
            IbanCleanerError::IoError(_) => ErrorType::Process,
            IbanCleanerError::Write(_) => ErrorType::Write,
            IbanCleanerError::ConfigError(_) => ErrorType::Config,
            IbanCleanerError::EncodingError(_) => ErrorType::Format,
        }
    }
}

impl From<calamine::Error> for IbanCleanerError {
    fn from(e: calamine::Error) -> Self {
        IbanCleanerError::Format(e.to_string())
    }
}

impl From<csv::Error> for IbanCleanerError {
    fn from(e: csv::Error) -> Self {
        IbanCleanerError::Format(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for IbanCleanerError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        IbanCleanerError::Write(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IbanCleanerError>;
