//! PersonName value object.

use super::errors::NameError;
use crate::validation::{run_validators, Validator};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Letters (ASCII plus the Latin-1 accented range) and whitespace.
static NAME_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s]*$").expect("Failed to compile name charset regex"));

/// Minimum number of space-separated words.
pub const MIN_WORDS: usize = 2;

/// Minimum length of each word, in characters.
pub const MIN_WORD_LEN: usize = 2;

fn check_charset(name: &str) -> Result<(), NameError> {
    if NAME_CHARSET.is_match(name) {
        Ok(())
    } else {
        Err(NameError::Charset(name.to_string()))
    }
}

fn check_word_count(name: &str) -> Result<(), NameError> {
    if name.split(' ').count() < MIN_WORDS {
        return Err(NameError::Format {
            name: name.to_string(),
            reason: "at least two words are required",
        });
    }
    Ok(())
}

// Splits on single spaces, so a double space yields an empty word and fails.
fn check_word_length(name: &str) -> Result<(), NameError> {
    if name.split(' ').any(|word| word.chars().count() < MIN_WORD_LEN) {
        return Err(NameError::Format {
            name: name.to_string(),
            reason: "every word needs at least two letters",
        });
    }
    Ok(())
}

/// Validate a full name.
///
/// Rules run in order and stop at the first failure: letters and spaces
/// only, then at least two words, then every word at least two characters.
pub fn validate_name(text: &str) -> Result<(), NameError> {
    let rules: [&dyn Validator<str, NameError>; 3] =
        [&check_charset, &check_word_count, &check_word_length];
    run_validators(text, &rules)
}

/// A validated full name.
///
/// # Example
///
/// ```
/// use cadastro::domain::PersonName;
///
/// let name = PersonName::new("Ana Beatriz Souza").unwrap();
/// assert_eq!(name.short_name(), "Ana Beatriz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The first two words, as shown on a profile.
    pub fn short_name(&self) -> String {
        self.0.split(' ').take(2).collect::<Vec<_>>().join(" ")
    }

    /// Words of the name.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ')
    }
}

impl Serialize for PersonName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PersonName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PersonName::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
