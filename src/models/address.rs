//! Address model and the address registration form.

use crate::domain::{verify_postal_code, PostalCode};
use crate::error::{RegistrationError, RegistrationResult, RegistryResult};
use crate::registry::{CachedRegistry, CepAddress, PostalCodeRegistry, ViaCepClient};
use crate::validation::{run_validators, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of the neighbourhood column.
pub const NEIGHBOURHOOD_MAX_LEN: usize = 100;

/// Maximum length of the other text columns.
pub const TEXT_MAX_LEN: usize = 200;

/// A postal address belonging to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub user_id: u64,

    #[serde(rename = "bairro")]
    pub neighbourhood: String,

    #[serde(rename = "cidade")]
    pub city: String,

    #[serde(rename = "estado")]
    pub state: String,

    #[serde(rename = "logradouro")]
    pub street: String,

    #[serde(rename = "numero", deserialize_with = "super::positive_integer")]
    pub number: u32,

    #[serde(rename = "complemento")]
    pub complement: String,

    #[serde(rename = "cep")]
    pub postal_code: PostalCode,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.postal_code)
    }
}

/// Raw input of the address form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewAddress {
    #[serde(default, alias = "usuario")]
    pub user_id: u64,

    #[serde(default, alias = "bairro")]
    pub neighbourhood: String,

    #[serde(default, alias = "cidade")]
    pub city: String,

    #[serde(default, alias = "estado")]
    pub state: String,

    #[serde(default, alias = "logradouro")]
    pub street: String,

    #[serde(alias = "numero", deserialize_with = "super::positive_integer")]
    pub number: u32,

    #[serde(default, alias = "complemento")]
    pub complement: String,

    #[serde(alias = "cep")]
    pub postal_code: String,
}

fn required(field: &'static str, value: &str, max_len: usize) -> RegistrationResult<()> {
    if value.trim().is_empty() {
        return Err(RegistrationError::Field {
            field,
            reason: "this field is required".to_string(),
        });
    }
    if value.chars().count() > max_len {
        return Err(RegistrationError::Field {
            field,
            reason: format!("must have at most {} characters", max_len),
        });
    }
    Ok(())
}

fn check_neighbourhood(form: &NewAddress) -> RegistrationResult<()> {
    required("bairro", &form.neighbourhood, NEIGHBOURHOOD_MAX_LEN)
}

fn check_city(form: &NewAddress) -> RegistrationResult<()> {
    required("cidade", &form.city, TEXT_MAX_LEN)
}

fn check_state(form: &NewAddress) -> RegistrationResult<()> {
    required("estado", &form.state, TEXT_MAX_LEN)
}

fn check_street(form: &NewAddress) -> RegistrationResult<()> {
    required("logradouro", &form.street, TEXT_MAX_LEN)
}

fn check_number(form: &NewAddress) -> RegistrationResult<()> {
    super::check_positive_integer("numero", form.number)
}

fn check_complement(form: &NewAddress) -> RegistrationResult<()> {
    required("complemento", &form.complement, TEXT_MAX_LEN)
}

impl NewAddress {
    /// Fill blank street, neighbourhood, city and state from a registry answer.
    ///
    /// Fields the user already typed are kept.
    pub fn prefill(&mut self, found: &CepAddress) {
        let fill = |slot: &mut String, value: &str| {
            if slot.trim().is_empty() {
                *slot = value.to_string();
            }
        };
        fill(&mut self.street, &found.street);
        fill(&mut self.neighbourhood, &found.neighbourhood);
        fill(&mut self.city, &found.city);
        fill(&mut self.state, &found.state);
    }

    /// Whether any field [`NewAddress::prefill`] would fill is blank.
    pub fn needs_prefill(&self) -> bool {
        [&self.street, &self.neighbourhood, &self.city, &self.state]
            .iter()
            .any(|v| v.trim().is_empty())
    }

    /// Fill blank fields from ViaCEP when the CEP is well formed.
    ///
    /// The answer is kept in `registry`, so [`NewAddress::validate`] with the
    /// same registry does not ask ViaCEP again.
    pub fn prefill_from(&mut self, registry: &CachedRegistry<ViaCepClient>) -> RegistryResult<()> {
        if !self.needs_prefill() {
            return Ok(());
        }
        let Ok(code) = PostalCode::parse(&self.postal_code) else {
            return Ok(());
        };
        if let Some(found) = registry.lookup(&code)? {
            self.prefill(&found);
        }
        Ok(())
    }

    /// Validate the form and build the address.
    ///
    /// Local fields are checked first; `registry` is only consulted once
    /// everything else is valid, and the postal code is the last check.
    pub fn validate<R>(self, registry: &R) -> RegistrationResult<Address>
    where
        R: PostalCodeRegistry + ?Sized,
    {
        let rules: [&dyn Validator<NewAddress, RegistrationError>; 6] = [
            &check_neighbourhood,
            &check_city,
            &check_state,
            &check_street,
            &check_number,
            &check_complement,
        ];
        run_validators(&self, &rules)?;

        let postal_code = verify_postal_code(&self.postal_code, registry)?;

        Ok(Address {
            user_id: self.user_id,
            neighbourhood: self.neighbourhood,
            city: self.city,
            state: self.state,
            street: self.street,
            number: self.number,
            complement: self.complement,
            postal_code,
        })
    }
}
