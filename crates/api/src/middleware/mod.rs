//! Request extractors and authorization helpers.
//!
//! - [`auth::AuthUser`] -- the authenticated actor, from a JWT Bearer token.
//! - [`policy`] -- per-project access checks backed by the membership table.

pub mod auth;
pub mod policy;
