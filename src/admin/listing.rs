//! The user admin's list page: which rows, which columns, in what order.

use super::policy::AdminPolicy;
use crate::models::User;
use serde::Serialize;

/// One row of the user list: name, email and CPF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: Option<u64>,
    pub name: String,
    pub email: String,
    pub cpf: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.to_string(),
            email: user.email.to_string(),
            cpf: user.cpf.to_string(),
        }
    }
}

/// Query for the user list.
#[derive(Debug, Clone, Default)]
pub struct UserListing {
    /// Case-insensitive substring matched against the name
    pub search: Option<String>,
}

impl UserListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    fn matches(&self, user: &User) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => user
                .name
                .as_str()
                .to_lowercase()
                .contains(&query.to_lowercase()),
        }
    }

    /// Rows visible to `actor`, filtered by the search and ordered by name.
    pub fn rows(&self, policy: &AdminPolicy, actor: &User, users: &[User]) -> Vec<UserRow> {
        let mut rows: Vec<UserRow> = policy
            .visible_users(actor, users)
            .into_iter()
            .filter(|u| self.matches(u))
            .map(UserRow::from)
            .collect();

        rows.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        rows
    }
}
