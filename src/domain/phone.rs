//! Mobile phone number with area code.

use super::errors::PhoneError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// `(DD) DDDDD-DDDD`, anchored on both ends.
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\([0-9]{2}\) [0-9]{5}-[0-9]{4}$").expect("Failed to compile phone regex")
});

/// Validate a phone number with area code.
///
/// # Errors
///
/// Returns `PhoneError::Format` unless the whole text matches `(DD) DDDDD-DDDD`.
pub fn validate_phone(text: &str) -> Result<(), PhoneError> {
    if PHONE_PATTERN.is_match(text) {
        Ok(())
    } else {
        Err(PhoneError::Format(text.to_string()))
    }
}

/// A validated mobile phone number with area code.
///
/// # Example
///
/// ```
/// use cadastro::domain::PhoneNumber;
///
/// let phone = PhoneNumber::new("(11) 91234-5678").unwrap();
/// assert_eq!(phone.area_code(), "11");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(phone: impl Into<String>) -> Result<Self, PhoneError> {
        let phone = phone.into();
        validate_phone(&phone)?;
        Ok(Self(phone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The two-digit area code (DDD).
    pub fn area_code(&self) -> &str {
        &self.0[1..3]
    }

    /// The 11 digits, area code first.
    pub fn digits_only(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PhoneNumber::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
