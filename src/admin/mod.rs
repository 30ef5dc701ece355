//! User admin rules.
//!
//! The admin UI itself is provided by the host application. This module
//! decides what an acting user may do in it and which rows they see.

pub mod listing;
pub mod policy;

pub use listing::{UserListing, UserRow};
pub use policy::{AdminPolicy, FieldAccess, Permission, Role, UserChanges, PRIVILEGE_FIELDS};
