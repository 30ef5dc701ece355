//! PostalCode (CEP) value object.

use super::errors::PostalCodeError;
use crate::error::RegistryResult;
use crate::registry::PostalCodeRegistry;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Number of digits in a CEP.
pub const CEP_LEN: usize = 8;

/// A CEP with a well-formed shape.
///
/// Construction only checks the shape. Whether the code exists is a question
/// for a [`PostalCodeRegistry`]; see [`validate_postal_code`].
///
/// # Example
///
/// ```
/// use cadastro::domain::PostalCode;
///
/// let cep = PostalCode::parse("01001000").unwrap();
/// assert_eq!(cep.to_string(), "01001-000");
/// assert_eq!(cep.digits(), "01001000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostalCode([u8; CEP_LEN]);

impl PostalCode {
    /// Strip dashes and read exactly 8 ASCII digits.
    pub fn parse(text: &str) -> Result<Self, PostalCodeError> {
        let mut digits = [0u8; CEP_LEN];
        let mut count = 0;

        for c in text.chars().filter(|&c| c != '-') {
            match c.to_digit(10) {
                Some(d) if count < CEP_LEN => {
                    digits[count] = d as u8;
                    count += 1;
                }
                _ => return Err(PostalCodeError::Format(text.to_string())),
            }
        }

        if count != CEP_LEN {
            return Err(PostalCodeError::Format(text.to_string()));
        }
        Ok(Self(digits))
    }

    /// The 8 digits without punctuation, as the registry expects them.
    pub fn digits(&self) -> String {
        self.0.iter().map(|d| char::from(b'0' + d)).collect()
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.digits();
        write!(f, "{}-{}", &s[..5], &s[5..])
    }
}

impl Serialize for PostalCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PostalCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PostalCode::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Check only the shape of a CEP: 8 digits once `-` is stripped.
pub fn validate_postal_code_format(text: &str) -> Result<(), PostalCodeError> {
    PostalCode::parse(text).map(|_| ())
}

/// Check the shape of a CEP, then ask `registry` whether it exists.
///
/// The registry is only consulted for well-formed codes.
///
/// # Errors
///
/// - `PostalCodeError::Format` for a malformed code
/// - `PostalCodeError::NotFound` when the registry does not know the code
/// - `PostalCodeError::LookupUnavailable` when the registry cannot answer
pub fn validate_postal_code<R>(text: &str, registry: &R) -> Result<(), PostalCodeError>
where
    R: PostalCodeRegistry + ?Sized,
{
    verify_postal_code(text, registry).map(|_| ())
}

/// Like [`validate_postal_code`], returning the parsed code on success.
pub fn verify_postal_code<R>(text: &str, registry: &R) -> Result<PostalCode, PostalCodeError>
where
    R: PostalCodeRegistry + ?Sized,
{
    let code = PostalCode::parse(text)?;
    registry_answer(code, registry.exists(&code))
}

/// Turn a registry answer for `code` into a validation outcome.
pub(crate) fn registry_answer(
    code: PostalCode,
    answer: RegistryResult<bool>,
) -> Result<PostalCode, PostalCodeError> {
    match answer {
        Ok(true) => Ok(code),
        Ok(false) => Err(PostalCodeError::NotFound(code.to_string())),
        Err(e) => {
            tracing::warn!("CEP lookup for {} failed: {}", code, e);
            Err(PostalCodeError::LookupUnavailable {
                code: code.to_string(),
                reason: e.to_string(),
            })
        }
    }
}
