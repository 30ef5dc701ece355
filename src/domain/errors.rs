//! Field validation errors.
//!
//! Each validated value has its own error enum so callers can match on the
//! exact failure. All of them map onto a shared [`ErrorKind`].

use serde::Serialize;
use thiserror::Error;

/// The category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Shape or pattern mismatch.
    Format,

    /// Disallowed characters.
    Charset,

    /// Numeric checksum mismatch.
    Checksum,

    /// The remote registry reports the value does not exist.
    Lookup,

    /// The remote registry could not be reached or timed out.
    LookupUnavailable,
}

/// Errors produced while validating a CPF.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CpfError {
    /// Not 11 decimal digits once `.` and `-` are stripped.
    #[error("CPF must be in the format ddd.ddd.ddd-dd, got: {0}")]
    Format(String),

    /// The check digits do not match the body.
    #[error("CPF checksum mismatch: {0}")]
    Checksum(String),
}

impl CpfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format(_) => ErrorKind::Format,
            Self::Checksum(_) => ErrorKind::Checksum,
        }
    }
}

/// Errors produced while validating a person's name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Contains something other than letters and whitespace.
    #[error("name must contain only letters: {0}")]
    Charset(String),

    /// Too few words, or a word that is too short.
    #[error("name {name:?} is insufficient: {reason}")]
    Format { name: String, reason: &'static str },
}

impl NameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Charset(_) => ErrorKind::Charset,
            Self::Format { .. } => ErrorKind::Format,
        }
    }
}

/// Errors produced while validating a phone number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone must be in the format (DD) DDDDD-DDDD, got: {0}")]
    Format(String),
}

impl PhoneError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Format
    }
}

/// Errors produced while validating an email address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("invalid email address: {0}")]
    Format(String),
}

impl EmailError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Format
    }
}

/// Errors produced while validating a CEP.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// Not 8 decimal digits once `-` is stripped.
    #[error("CEP must have 8 digits, got: {0}")]
    Format(String),

    /// The registry answered and does not know the code.
    #[error("CEP not found: {0}")]
    NotFound(String),

    /// The registry could not answer. Callers may retry with backoff.
    #[error("CEP lookup unavailable for {code}: {reason}")]
    LookupUnavailable { code: String, reason: String },
}

impl PostalCodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format(_) => ErrorKind::Format,
            Self::NotFound(_) => ErrorKind::Lookup,
            Self::LookupUnavailable { .. } => ErrorKind::LookupUnavailable,
        }
    }

    /// Whether the failure is transient infrastructure trouble rather than
    /// a verdict about the value.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LookupUnavailable { .. })
    }
}
