use crate::error::{IbanCleanerError, Result};
use crate::types::constants::CHARSET_GUESS_SIZE;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Allow guessing UTF-8 encoding
const ALLOW_UTF8: bool = true;

/// Detect the character encoding of delimited text.
/// A byte order mark wins; otherwise valid UTF-8 is taken as is for small
/// samples and chardetng guesses the rest.
pub fn detect_encoding(data: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        return encoding;
    }

    if data.len() <= CHARSET_GUESS_SIZE && std::str::from_utf8(data).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    detector.guess(None, ALLOW_UTF8)
}

/// Decode delimited text to UTF-8, dropping any byte order mark
pub fn decode_text(data: &[u8]) -> Result<String> {
    let encoding = detect_encoding(data);

    // decode() sniffs and strips the BOM itself
    let (decoded, used, had_errors) = encoding.decode(data);

    // Broken UTF-8 or UTF-16 means the bytes were not text after all
    if had_errors && (used == UTF_8 || used == UTF_16LE || used == UTF_16BE) {
        return Err(IbanCleanerError::EncodingError(format!(
            "Invalid {} data",
            used.name()
        )));
    }

    Ok(decoded.into_owned())
}
