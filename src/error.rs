//! Error types for the cadastro crate.
//!
//! Field-level validation errors live in [`crate::domain::errors`]. This
//! module holds the errors of the collaborators and of the entity forms.

use crate::domain::{CpfError, EmailError, ErrorKind, NameError, PhoneError, PostalCodeError};
use thiserror::Error;

/// Errors that can occur when talking to a postal-code registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Registry returned an unexpected status code
    #[error("registry error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors raised while turning a registration form into an entity.
///
/// Forms stop at the first invalid field, so there is only ever one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("nome: {0}")]
    Name(#[from] NameError),

    #[error("email: {0}")]
    Email(#[from] EmailError),

    #[error("cpf: {0}")]
    Cpf(#[from] CpfError),

    #[error("telefone: {0}")]
    Phone(#[from] PhoneError),

    #[error("cep: {0}")]
    PostalCode(#[from] PostalCodeError),

    /// Password and confirmation differ, or the password is empty.
    #[error("Passwords don't match")]
    PasswordMismatch,

    /// A required field is blank or exceeds its maximum length.
    #[error("{field}: {reason}")]
    Field { field: &'static str, reason: String },
}

impl RegistrationError {
    /// Name of the form field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "nome",
            Self::Email(_) => "email",
            Self::Cpf(_) => "cpf",
            Self::Phone(_) => "telefone",
            Self::PostalCode(_) => "cep",
            Self::PasswordMismatch => "password2",
            Self::Field { field, .. } => *field,
        }
    }

    /// Kind of the underlying failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Name(e) => e.kind(),
            Self::Email(e) => e.kind(),
            Self::Cpf(e) => e.kind(),
            Self::Phone(e) => e.kind(),
            Self::PostalCode(e) => e.kind(),
            Self::PasswordMismatch | Self::Field { .. } => ErrorKind::Format,
        }
    }

    /// Whether retrying the same form later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PostalCode(e) if e.is_retryable())
    }
}

/// Errors raised by the user admin policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// The acting user lacks the permission for this action
    #[error("permission denied: {action}")]
    Forbidden { action: &'static str },

    /// The acting user may not edit this field
    #[error("field is read-only for this user: {0}")]
    FieldLocked(&'static str),

    /// The target row is not visible to the acting user
    #[error("user not found: {0}")]
    NotVisible(u64),
}

/// Convenience type alias for Results with RegistryError
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with RegistrationError
pub type RegistrationResult<T> = Result<T, RegistrationError>;
