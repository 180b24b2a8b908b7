pub mod charset;
pub mod delimiter;
pub mod iban;

pub use charset::{decode_text, detect_encoding};
pub use delimiter::detect_delimiter;
pub use iban::{detect_iban_column, looks_like_iban};
