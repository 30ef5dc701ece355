//! Role-based permissions for the user admin.
//!
//! Superusers may do anything. Staff may view and change, but only their own
//! row, and never their own privilege fields. Everyone else may do nothing.
//! Inactive users are treated as having no role at all.

use crate::domain::{Cpf, EmailAddress, PersonName, PhoneNumber};
use crate::error::AdminError;
use crate::models::{Gender, MaritalStatus, User};
use serde::Serialize;

/// What an acting user is allowed to be, as far as the admin is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superuser,
    Staff,
    Regular,
}

impl Role {
    pub fn of(user: &User) -> Self {
        if !user.is_active {
            Role::Regular
        } else if user.is_superuser {
            Role::Superuser
        } else if user.is_staff {
            Role::Staff
        } else {
            Role::Regular
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Add,
    Change,
    Delete,
    View,
}

impl Permission {
    fn action(self) -> &'static str {
        match self {
            Permission::Add => "add",
            Permission::Change => "change",
            Permission::Delete => "delete",
            Permission::View => "view",
        }
    }
}

/// How a form field is presented to the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAccess {
    Editable,
    Disabled,
    Hidden,
}

/// Privilege fields only a superuser may touch.
pub const PRIVILEGE_FIELDS: [&str; 5] = [
    "is_active",
    "is_staff",
    "is_superuser",
    "groups",
    "user_permissions",
];

/// An edit to an existing user. `None` leaves the field unchanged.
///
/// Values are already validated types, so an accepted change cannot put an
/// invalid field on a user.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<PersonName>,
    pub email: Option<EmailAddress>,
    pub cpf: Option<Cpf>,
    pub gender: Option<Option<Gender>>,
    pub marital_status: Option<Option<MaritalStatus>>,
    pub phone: Option<Option<PhoneNumber>>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub groups: Option<Vec<String>>,
    pub user_permissions: Option<Vec<String>>,
}

impl UserChanges {
    /// Privilege fields this change would modify.
    fn touched_privileges(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            self.is_active.is_some(),
            self.is_staff.is_some(),
            self.is_superuser.is_some(),
            self.groups.is_some(),
            self.user_permissions.is_some(),
        ]
        .into_iter()
        .zip(PRIVILEGE_FIELDS)
        .filter_map(|(touched, field)| touched.then_some(field))
    }
}

/// The user admin's permission rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminPolicy;

impl AdminPolicy {
    pub fn has_permission(&self, actor: &User, permission: Permission) -> bool {
        match (Role::of(actor), permission) {
            (Role::Superuser, _) => true,
            (Role::Staff, Permission::Change | Permission::View) => true,
            _ => false,
        }
    }

    pub fn can_add(&self, actor: &User) -> bool {
        self.has_permission(actor, Permission::Add)
    }

    pub fn can_change(&self, actor: &User) -> bool {
        self.has_permission(actor, Permission::Change)
    }

    pub fn can_delete(&self, actor: &User) -> bool {
        self.has_permission(actor, Permission::Delete)
    }

    pub fn can_view(&self, actor: &User) -> bool {
        self.has_permission(actor, Permission::View)
    }

    /// `Ok(())` if `actor` holds `permission`.
    pub fn check(&self, actor: &User, permission: Permission) -> Result<(), AdminError> {
        if self.has_permission(actor, permission) {
            Ok(())
        } else {
            tracing::debug!(actor = ?actor.id, action = permission.action(), "permission denied");
            Err(AdminError::Forbidden {
                action: permission.action(),
            })
        }
    }

    /// How `field` appears on the change form for `actor`.
    pub fn field_access(&self, actor: &User, field: &str) -> FieldAccess {
        if Role::of(actor) == Role::Superuser {
            return FieldAccess::Editable;
        }
        match field {
            "is_active" => FieldAccess::Hidden,
            f if PRIVILEGE_FIELDS.iter().any(|p| *p == f) => FieldAccess::Disabled,
            _ => FieldAccess::Editable,
        }
    }

    /// Fields `actor` may not edit.
    pub fn locked_fields(&self, actor: &User) -> Vec<&'static str> {
        PRIVILEGE_FIELDS
            .into_iter()
            .filter(|f| self.field_access(actor, f) != FieldAccess::Editable)
            .collect()
    }

    /// Whether `target` shows up in `actor`'s listing.
    pub fn can_see(&self, actor: &User, target: &User) -> bool {
        match Role::of(actor) {
            Role::Superuser => true,
            Role::Staff => actor.id.is_some() && actor.id == target.id,
            Role::Regular => false,
        }
    }

    /// Rows of `users` visible to `actor`.
    pub fn visible_users<'a>(&self, actor: &User, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|u| self.can_see(actor, u)).collect()
    }

    /// Apply `changes` to `target` on behalf of `actor`.
    ///
    /// Nothing is modified unless every check passes.
    pub fn apply_change(
        &self,
        actor: &User,
        target: &mut User,
        changes: UserChanges,
    ) -> Result<(), AdminError> {
        self.check(actor, Permission::Change)?;

        if !self.can_see(actor, target) {
            return Err(AdminError::NotVisible(target.id.unwrap_or_default()));
        }

        if let Some(field) = changes
            .touched_privileges()
            .find(|f| self.field_access(actor, f) != FieldAccess::Editable)
        {
            return Err(AdminError::FieldLocked(field));
        }

        let UserChanges {
            name,
            email,
            cpf,
            gender,
            marital_status,
            phone,
            is_active,
            is_staff,
            is_superuser,
            groups,
            user_permissions,
        } = changes;

        if let Some(v) = name {
            target.name = v;
        }
        if let Some(v) = email {
            target.email = v;
        }
        if let Some(v) = cpf {
            target.cpf = v;
        }
        if let Some(v) = gender {
            target.gender = v;
        }
        if let Some(v) = marital_status {
            target.marital_status = v;
        }
        if let Some(v) = phone {
            target.phone = v;
        }
        if let Some(v) = is_active {
            target.is_active = v;
        }
        if let Some(v) = is_staff {
            target.is_staff = v;
        }
        if let Some(v) = is_superuser {
            target.is_superuser = v;
        }
        if let Some(v) = groups {
            target.groups = v;
        }
        if let Some(v) = user_permissions {
            target.user_permissions = v;
        }

        tracing::info!(actor = ?actor.id, target = ?target.id, "user updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;

    fn user(id: u64, name: &str, cpf: &str) -> User {
        NewUser {
            name: name.to_string(),
            email: format!("u{}@example.com", id),
            cpf: cpf.to_string(),
            password: "pw".to_string(),
            password_confirmation: "pw".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap()
        .with_id(id)
    }

    fn superuser() -> User {
        let mut u = user(1, "Root Admin", "529.982.247-25");
        u.is_superuser = true;
        u
    }

    fn staff() -> User {
        user(2, "Staff Member", "123.456.789-09")
    }

    fn regular() -> User {
        let mut u = user(3, "Plain User", "529.982.247-25");
        u.is_staff = false;
        u
    }

    #[test]
    fn test_permission_matrix() {
        let policy = AdminPolicy;
        let (su, st, re) = (superuser(), staff(), regular());

        assert!(policy.can_add(&su) && policy.can_change(&su));
        assert!(policy.can_delete(&su) && policy.can_view(&su));

        assert!(!policy.can_add(&st) && !policy.can_delete(&st));
        assert!(policy.can_change(&st) && policy.can_view(&st));

        for p in [Permission::Add, Permission::Change, Permission::Delete, Permission::View] {
            assert!(!policy.has_permission(&re, p));
        }
    }

    #[test]
    fn test_inactive_superuser_has_no_role() {
        let mut su = superuser();
        su.is_active = false;
        assert_eq!(Role::of(&su), Role::Regular);
        assert_eq!(
            AdminPolicy.check(&su, Permission::View),
            Err(AdminError::Forbidden { action: "view" })
        );
    }

    #[test]
    fn test_field_access() {
        let policy = AdminPolicy;
        assert!(policy.locked_fields(&superuser()).is_empty());

        let st = staff();
        assert_eq!(policy.field_access(&st, "is_active"), FieldAccess::Hidden);
        assert_eq!(policy.field_access(&st, "is_superuser"), FieldAccess::Disabled);
        assert_eq!(policy.field_access(&st, "telefone"), FieldAccess::Editable);
        assert_eq!(policy.locked_fields(&st), PRIVILEGE_FIELDS.to_vec());
    }

    #[test]
    fn test_staff_sees_only_self() {
        let users = vec![superuser(), staff(), regular()];
        let st = staff();

        let visible = AdminPolicy.visible_users(&st, &users);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, Some(2));

        assert_eq!(AdminPolicy.visible_users(&superuser(), &users).len(), 3);
        assert!(AdminPolicy.visible_users(&regular(), &users).is_empty());
    }

    #[test]
    fn test_staff_cannot_escalate() {
        let st = staff();
        let mut target = staff();
        let changes = UserChanges {
            is_superuser: Some(true),
            ..Default::default()
        };

        let err = AdminPolicy.apply_change(&st, &mut target, changes).unwrap_err();
        assert_eq!(err, AdminError::FieldLocked("is_superuser"));
        assert!(!target.is_superuser);
    }

    #[test]
    fn test_staff_edits_own_profile() {
        let st = staff();
        let mut target = staff();
        let changes = UserChanges {
            phone: Some(Some(PhoneNumber::new("(11) 91234-5678").unwrap())),
            marital_status: Some(Some(MaritalStatus::Single)),
            ..Default::default()
        };

        AdminPolicy.apply_change(&st, &mut target, changes).unwrap();
        assert_eq!(target.phone.as_ref().unwrap().as_str(), "(11) 91234-5678");
        assert_eq!(target.marital_status, Some(MaritalStatus::Single));
    }

    #[test]
    fn test_staff_cannot_edit_others() {
        let st = staff();
        let mut target = regular();
        let changes = UserChanges {
            name: Some(PersonName::new("Outro Nome").unwrap()),
            ..Default::default()
        };

        let err = AdminPolicy.apply_change(&st, &mut target, changes).unwrap_err();
        assert_eq!(err, AdminError::NotVisible(3));
        assert_eq!(target.name.as_str(), "Plain User");
    }

    #[test]
    fn test_superuser_grants_privileges() {
        let su = superuser();
        let mut target = regular();
        let changes = UserChanges {
            is_staff: Some(true),
            groups: Some(vec!["atendimento".to_string()]),
            ..Default::default()
        };

        AdminPolicy.apply_change(&su, &mut target, changes).unwrap();
        assert!(target.is_staff);
        assert_eq!(target.groups, vec!["atendimento".to_string()]);
    }

    #[test]
    fn test_regular_user_forbidden() {
        let re = regular();
        let mut target = regular();
        let err = AdminPolicy
            .apply_change(&re, &mut target, UserChanges::default())
            .unwrap_err();
        assert_eq!(err, AdminError::Forbidden { action: "change" });
    }
}
