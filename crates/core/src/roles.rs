//! Project membership role names.
//!
//! These must match the CHECK constraint on `user_projects.role`.

pub const ROLE_MEMBER: &str = "member";
pub const ROLE_ADMIN: &str = "admin";
