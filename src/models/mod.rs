//! Registration entities.
//!
//! Users, their addresses and clients, plus the forms that validate raw input
//! into them. Storing these is left to the host application.

pub mod address;
pub mod client;
pub mod user;

pub use address::{Address, NewAddress};
pub use client::Client;
pub use user::{Gender, MaritalStatus, NewUser, User};

use crate::error::{RegistrationError, RegistrationResult};
use serde::{Deserialize, Deserializer};

/// Largest value of a positive-integer column (a signed 32-bit maximum).
pub const MAX_POSITIVE_INTEGER: u32 = i32::MAX as u32;

fn check_positive_integer(field: &'static str, value: u32) -> RegistrationResult<()> {
    if value > MAX_POSITIVE_INTEGER {
        return Err(RegistrationError::Field {
            field,
            reason: format!("must be at most {}", MAX_POSITIVE_INTEGER),
        });
    }
    Ok(())
}

/// Deserialize a `u32` no larger than [`MAX_POSITIVE_INTEGER`].
fn positive_integer<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u32::deserialize(deserializer)?;
    if value > MAX_POSITIVE_INTEGER {
        return Err(serde::de::Error::custom(format!(
            "must be at most {}, got: {}",
            MAX_POSITIVE_INTEGER, value
        )));
    }
    Ok(value)
}
