//! cadastro - field validation for a user-registration backend.
//!
//! Validates the fields of users and addresses (CPF, CEP, full name, phone,
//! email) and decides what each role may do in the user admin. Storage, HTTP
//! serving and the admin UI belong to the host application.
//!
//! # Architecture
//!
//! - **domain**: value objects and the `validate_*` functions
//! - **validation**: ordered, fail-fast validator pipeline
//! - **registry**: injected postal-code existence check (ViaCEP, cache, async)
//! - **models**: users, addresses, clients and their registration forms
//! - **admin**: role-based permissions and the user list
//! - **error**: error types for registry, config and forms
//! - **config**: configuration from environment variables
//! - **metrics**: lookup counters
//!
//! # Example
//!
//! ```
//! use cadastro::domain::{validate_cpf, validate_postal_code, ErrorKind};
//!
//! assert!(validate_cpf("529.982.247-25").is_ok());
//!
//! let known = |code: &str| code == "01001000";
//! assert!(validate_postal_code("01001-000", &known).is_ok());
//! let err = validate_postal_code("99999-999", &known).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Lookup);
//! ```

pub mod admin;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod validation;

pub use admin::{AdminPolicy, Role, UserListing};
pub use config::Config;
pub use domain::{
    validate_cpf, validate_name, validate_phone, validate_postal_code,
    validate_postal_code_format, Cpf, ErrorKind, PersonName, PhoneNumber, PostalCode,
};
pub use error::{AdminError, ConfigError, RegistrationError, RegistryError};
pub use metrics::{Metrics, MetricsSummary};
pub use models::{Address, Client, NewAddress, NewUser, User};
pub use registry::{CachedRegistry, PostalCodeRegistry, ViaCepClient};
pub use validation::{run_validators, Pipeline, Validator};
