//! Email address, the login identifier of a user.

use super::errors::EmailError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A normalized email address.
///
/// Surrounding whitespace is trimmed and the domain part is lower-cased; the
/// local part is kept as typed.
///
/// # Example
///
/// ```
/// use cadastro::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Ana@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "Ana@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and normalize an address.
    ///
    /// Requires one `@`, a non-empty local part, no whitespace, and a dotted
    /// domain without empty labels.
    pub fn new(email: impl AsRef<str>) -> Result<Self, EmailError> {
        let raw = email.as_ref().trim();

        let Some((local, domain)) = raw.split_once('@') else {
            return Err(EmailError::Format(raw.to_string()));
        };

        if !Self::is_valid(local, domain) {
            return Err(EmailError::Format(raw.to_string()));
        }

        Ok(Self(format!("{}@{}", local, domain.to_lowercase())))
    }

    fn is_valid(local: &str, domain: &str) -> bool {
        if local.is_empty() || domain.contains('@') {
            return false;
        }
        if local.chars().any(char::is_whitespace) || domain.chars().any(char::is_whitespace) {
            return false;
        }
        domain.contains('.') && domain.split('.').all(|part| !part.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Text before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map(|(local, _)| local).unwrap_or(&self.0)
    }

    /// Lower-cased text after the `@`.
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, domain)| domain).unwrap_or("")
    }
}

impl Serialize for EmailAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EmailAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EmailAddress::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
