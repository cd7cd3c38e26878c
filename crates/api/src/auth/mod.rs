//! Authentication primitives.
//!
//! - [`jwt`] -- bearer header parsing and HS256 token verification.

pub mod jwt;
