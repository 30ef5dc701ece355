//! Postal-code registry: the external existence check.
//!
//! The validators never reach the network themselves. They receive a
//! [`PostalCodeRegistry`] and ask it whether a well-formed code exists:
//!
//! - [`ViaCepClient`] answers over HTTP from the public ViaCEP service
//! - [`CachedRegistry`] keeps definitive answers for a while
//! - [`AsyncRegistry`] runs any blocking registry off the async runtime
//! - any `Fn(&str) -> bool` closure is a registry, which is what tests use

mod async_registry;
mod cached;
mod viacep;

pub use async_registry::{validate_postal_code_async, AsyncPostalCodeRegistry, AsyncRegistry};
pub use cached::CachedRegistry;
pub use viacep::{CepAddress, ViaCepClient};

use crate::domain::PostalCode;
use crate::error::RegistryResult;

/// Answers whether a postal code exists.
///
/// `Ok(false)` means the registry answered and does not know the code.
/// `Err(_)` means it could not answer at all.
pub trait PostalCodeRegistry: Send + Sync {
    fn exists(&self, code: &PostalCode) -> RegistryResult<bool>;
}

/// A plain predicate over the 8-digit string. It never reports an outage.
impl<F> PostalCodeRegistry for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn exists(&self, code: &PostalCode) -> RegistryResult<bool> {
        Ok(self(&code.digits()))
    }
}
