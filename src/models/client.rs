//! Client model.

use crate::error::RegistrationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user that is also a client. One client per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub user_id: u64,

    /// Non-negative registration code
    #[serde(alias = "codigo_cadastro", deserialize_with = "super::positive_integer")]
    pub registration_code: u32,

    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Fails when the code exceeds [`super::MAX_POSITIVE_INTEGER`].
    pub fn new(user_id: u64, registration_code: u32) -> RegistrationResult<Self> {
        super::check_positive_integer("codigo_cadastro", registration_code)?;
        Ok(Self {
            user_id,
            registration_code,
            created_at: Utc::now(),
        })
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client #{}", self.registration_code)
    }
}
