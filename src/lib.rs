pub mod cleaner;
pub mod config;
pub mod detection;
pub mod error;
pub mod output;
pub mod reader;
pub mod table;
pub mod types;
pub mod validation;
pub mod writer;

pub use cleaner::{process, IbanCleaner, Outcome, Summary};
pub use config::{Config, Settings};
pub use error::{IbanCleanerError, Result};
pub use table::{Cell, Table};
pub use types::{ErrorType, Status};
pub use validation::is_valid_iban;
