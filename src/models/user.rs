//! User model and the user registration form.

use crate::domain::{
    validate_cpf, validate_name, validate_phone, Cpf, EmailAddress, PersonName, PhoneNumber,
};
use crate::error::{RegistrationError, RegistrationResult};
use crate::validation::Pipeline;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of the name column.
pub const NAME_MAX_LEN: usize = 500;

/// Maximum length of the email column.
pub const EMAIL_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Masculino")]
    Male,
    #[serde(rename = "Feminino")]
    Female,
    #[serde(rename = "Outro")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    #[serde(rename = "Solteiro(a)")]
    Single,
    #[serde(rename = "Casado(a)")]
    Married,
    #[serde(rename = "Divorciado(a)")]
    Divorced,
    #[serde(rename = "Viúvo(a)")]
    Widowed,
}

/// A registered user.
///
/// The email is the login identifier. Passwords are not held here; hashing
/// and storing them belongs to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the persistence layer; `None` until stored
    #[serde(default)]
    pub id: Option<u64>,

    pub name: PersonName,

    pub email: EmailAddress,

    pub cpf: Cpf,

    #[serde(default)]
    pub gender: Option<Gender>,

    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,

    #[serde(default)]
    pub phone: Option<PhoneNumber>,

    pub is_active: bool,

    pub is_staff: bool,

    pub is_superuser: bool,

    /// Names of the permission groups the user belongs to
    #[serde(default)]
    pub groups: Vec<String>,

    /// Permissions granted directly to the user
    #[serde(default)]
    pub user_permissions: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// The user with a storage id attached.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// First two words of the name, as shown on the profile.
    pub fn short_name(&self) -> String {
        self.name.short_name()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Raw input of the user registration form.
///
/// Field names follow the form's wire names (`nome`, `telefone`, ...) as
/// aliases so JSON from the original admin form deserializes unchanged.
#[derive(Clone, Default, Deserialize)]
pub struct NewUser {
    #[serde(alias = "nome")]
    pub name: String,

    pub email: String,

    pub cpf: String,

    #[serde(default, alias = "telefone")]
    pub phone: Option<String>,

    #[serde(default, alias = "genero")]
    pub gender: Option<Gender>,

    #[serde(default, alias = "estado_civil")]
    pub marital_status: Option<MaritalStatus>,

    #[serde(alias = "password1")]
    pub password: String,

    #[serde(alias = "password2")]
    pub password_confirmation: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("cpf", &self.cpf)
            .field("phone", &self.phone)
            .field("gender", &self.gender)
            .field("marital_status", &self.marital_status)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn check_name(form: &NewUser) -> RegistrationResult<()> {
    if form.name.chars().count() > NAME_MAX_LEN {
        return Err(RegistrationError::Field {
            field: "nome",
            reason: format!("must have at most {} characters", NAME_MAX_LEN),
        });
    }
    Ok(validate_name(&form.name)?)
}

fn check_email(form: &NewUser) -> RegistrationResult<()> {
    if form.email.chars().count() > EMAIL_MAX_LEN {
        return Err(RegistrationError::Field {
            field: "email",
            reason: format!("must have at most {} characters", EMAIL_MAX_LEN),
        });
    }
    EmailAddress::new(&form.email)?;
    Ok(())
}

fn check_cpf(form: &NewUser) -> RegistrationResult<()> {
    Ok(validate_cpf(&form.cpf)?)
}

fn check_phone(form: &NewUser) -> RegistrationResult<()> {
    match blank_to_none(&form.phone) {
        Some(phone) => Ok(validate_phone(phone)?),
        None => Ok(()),
    }
}

fn check_passwords(form: &NewUser) -> RegistrationResult<()> {
    if form.password.is_empty() || form.password != form.password_confirmation {
        return Err(RegistrationError::PasswordMismatch);
    }
    Ok(())
}

/// Field rules in form order.
static USER_FORM: Lazy<Pipeline<NewUser, RegistrationError>> = Lazy::new(|| {
    Pipeline::new()
        .rule(check_name)
        .rule(check_email)
        .rule(check_cpf)
        .rule(check_phone)
        .rule(check_passwords)
});

impl NewUser {
    /// Validate the form and build a regular user (staff, not superuser).
    pub fn validate(self) -> RegistrationResult<User> {
        self.build(false)
    }

    /// Validate the form and build a superuser.
    pub fn validate_superuser(self) -> RegistrationResult<User> {
        self.build(true)
    }

    fn build(self, superuser: bool) -> RegistrationResult<User> {
        USER_FORM.run(&self)?;

        let phone = blank_to_none(&self.phone).map(PhoneNumber::new).transpose()?;

        let user = User {
            id: None,
            name: PersonName::new(self.name)?,
            email: EmailAddress::new(&self.email)?,
            cpf: Cpf::parse(&self.cpf)?,
            gender: self.gender,
            marital_status: self.marital_status,
            phone,
            is_active: true,
            is_staff: true,
            is_superuser: superuser,
            groups: Vec::new(),
            user_permissions: Vec::new(),
            created_at: Utc::now(),
        };

        tracing::info!(superuser, "registered user {}", user.email);
        Ok(user)
    }
}
