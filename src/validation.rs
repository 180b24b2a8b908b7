use crate::types::constants::{BE_COUNTRY_CODE, BE_IBAN_LENGTH, IBAN_SEPARATORS};

/// Strip separators (space, hyphen, dot) and uppercase ASCII letters.
pub fn normalize_iban(raw: &str) -> String {
    raw.chars()
        .filter(|c| !IBAN_SEPARATORS.contains(c))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Structural check on an already normalized value: `BE` followed by 14 digits.
fn is_belgian_structure(normalized: &str) -> bool {
    normalized.len() == BE_IBAN_LENGTH
        && normalized.starts_with(BE_COUNTRY_CODE)
        && normalized[BE_COUNTRY_CODE.len()..]
            .bytes()
            .all(|b| b.is_ascii_digit())
}

/// Convert an IBAN into the digit string used for the mod-97 check.
///
/// The country code and check digits are moved to the end and every letter is
/// replaced by its base-36 value (A=10 ... Z=35). Returns `None` when the value
/// is not a structurally valid Belgian IBAN.
pub fn iban_to_numeric(raw: &str) -> Option<String> {
    let normalized = normalize_iban(raw);
    if !is_belgian_structure(&normalized) {
        return None;
    }

    // Safe to slice: the structure check guarantees ASCII only
    let rearranged = format!("{}{}", &normalized[4..], &normalized[..4]);

    let mut numeric = String::with_capacity(rearranged.len() + 4);
    for c in rearranged.chars() {
        if c.is_ascii_alphabetic() {
            numeric.push_str(&(c as u32 - 55).to_string());
        } else {
            numeric.push(c);
        }
    }

    Some(numeric)
}

/// Remainder of a decimal digit string modulo 97.
///
/// Computed digit by digit so arbitrarily long inputs never overflow.
/// Returns `None` on empty input or any non-digit character.
pub fn mod97(digits: &str) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }

    let mut remainder: u32 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(10)?;
        remainder = (remainder * 10 + digit) % 97;
    }

    Some(remainder)
}

/// Check whether a string is a valid Belgian IBAN.
///
/// Never panics: any value that is not `BE` + 14 digits after separator removal
/// is simply invalid.
pub fn is_valid_iban(raw: &str) -> bool {
    iban_to_numeric(raw)
        .and_then(|numeric| mod97(&numeric))
        .map(|remainder| remainder == 1)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_example_is_valid() {
        assert!(is_valid_iban("BE68539007547034"));
    }

    #[test]
    fn test_altered_digit_is_invalid() {
        assert!(!is_valid_iban("BE68539007547035"));
    }

    #[test]
    fn test_separators_do_not_change_verdict() {
        let variants = [
            "BE68 5390 0754 7034",
            "BE68-5390-0754-7034",
            "BE68.5390.0754.7034",
            "BE68 5390-0754.7034",
            "  BE 68 53 90 07 54 70 34 ",
            "BE685390-07547034",
        ];
        for v in variants {
            assert!(is_valid_iban(v), "{v} should be valid");
        }

        assert!(!is_valid_iban("BE68 5390 0754 7035"));
        assert!(!is_valid_iban("BE68-5390-0754-7035"));
    }

    #[test]
    fn test_lowercase_is_accepted() {
        assert!(is_valid_iban("be68 5390 0754 7034"));
    }

    #[test]
    fn test_wrong_length_or_prefix() {
        assert!(!is_valid_iban(""));
        assert!(!is_valid_iban("BE"));
        assert!(!is_valid_iban("BE6853900754703"));
        assert!(!is_valid_iban("BE685390075470341"));
        assert!(!is_valid_iban("NL68539007547034"));
        assert!(!is_valid_iban("NOTANIBAN"));
    }

    #[test]
    fn test_non_digit_characters_are_invalid() {
        // Length 16 after normalization but not BE + 14 digits
        assert!(!is_valid_iban("BE68539007547/34"));
        assert!(!is_valid_iban("BE6853900754703A"));
        assert!(!is_valid_iban("BE68_39007547034"));
        assert!(!is_valid_iban("BE6853900754703é"));
        assert!(!is_valid_iban("BEé8539007547034"));
    }

    #[test]
    fn test_all_zero_account_is_invalid() {
        assert!(!is_valid_iban("BE00-0000-0000-0000"));
    }

    #[test]
    fn test_iban_to_numeric() {
        assert_eq!(
            iban_to_numeric("BE68 5390 0754 7034").as_deref(),
            Some("539007547034111468")
        );
        assert_eq!(iban_to_numeric("NOTANIBAN"), None);
    }

    #[test]
    fn test_mod97() {
        assert_eq!(mod97("539007547034111468"), Some(1));
        assert_eq!(mod97("000000000000111400"), Some(44));
        assert_eq!(mod97("97"), Some(0));
        assert_eq!(mod97(""), None);
        assert_eq!(mod97("12a"), None);
    }

    #[test]
    fn test_normalize_iban() {
        assert_eq!(normalize_iban("be68 5390-0754.7034"), "BE68539007547034");
    }
}
