//! French phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// National prefix, optional separators, then four pairs of digits.
static FRENCH_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\+|00)33|0)\s*[1-9](?:[\s.-]*\d{2}){4}$").expect("Invalid regex")
});

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not a French phone number.
    #[error("phone number is not a valid French number")]
    Invalid,
}

/// A French phone number, stored as typed by the visitor (trimmed).
///
/// Accepts `06 12 34 56 78`, `06.12.34.56.78`, `+33 6 12 34 56 78` and
/// `0033612345678`. Whitespace is ignored during validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and
    /// [`PhoneError::Invalid`] when the number is not French.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !Self::is_valid(s) {
            return Err(PhoneError::Invalid);
        }

        Ok(Self(s.to_owned()))
    }

    /// Whether `s` is a valid French number once whitespace is removed.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        FRENCH_PHONE.is_match(&compact)
    }

    /// Returns the number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Group a ten digit national number in pairs (`06 24 31 67 90`).
    ///
    /// Anything else is returned unchanged.
    #[must_use]
    pub fn display(&self) -> String {
        format_french_phone(&self.0)
    }
}

/// Group a raw French number in pairs when it is a plain `0X` ten digit
/// number, otherwise return it unchanged.
#[must_use]
pub fn format_french_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 || !digits.starts_with('0') {
        return raw.to_owned();
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_french_formats() {
        for input in [
            "0612345678",
            "06 12 34 56 78",
            "06.12.34.56.78",
            "06-12-34-56-78",
            "+33612345678",
            "+33 6 12 34 56 78",
            "0033612345678",
        ] {
            assert!(PhoneNumber::parse(input).is_ok(), "{input} should parse");
        }
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
        assert_eq!(PhoneNumber::parse("0012345678"), Err(PhoneError::Invalid));
        assert_eq!(PhoneNumber::parse("06123456"), Err(PhoneError::Invalid));
        assert_eq!(PhoneNumber::parse("+44 20 7946 0958"), Err(PhoneError::Invalid));
        assert_eq!(PhoneNumber::parse("hello"), Err(PhoneError::Invalid));
    }

    #[test]
    fn test_display_groups_pairs() {
        let phone = PhoneNumber::parse("0624316790").unwrap();
        assert_eq!(phone.display(), "06 24 31 67 90");

        let intl = PhoneNumber::parse("+33624316790").unwrap();
        assert_eq!(intl.display(), "+33624316790");
    }
}
