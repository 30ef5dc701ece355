//! Domain value objects and field validators.
//!
//! This module contains the type-safe wrappers for registration fields: CPF,
//! CEP, full name, phone and email. Each has a free `validate_*` function
//! returning `Result<(), E>` and a value type that can only hold valid data.

pub mod cpf;
pub mod email;
pub mod errors;
pub mod person_name;
pub mod phone;
pub mod postal_code;

pub use cpf::{check_digit, is_valid_cpf, validate_cpf, Cpf};
pub use email::EmailAddress;
pub use errors::{CpfError, EmailError, ErrorKind, NameError, PhoneError, PostalCodeError};
pub use person_name::{validate_name, PersonName};
pub use phone::{validate_phone, PhoneNumber};
pub use postal_code::{
    validate_postal_code, validate_postal_code_format, verify_postal_code, PostalCode,
};
