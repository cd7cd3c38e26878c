//! Domain layer for the Flowgate workflow relay.
//!
//! Everything here is pure: no database, no network. The `db` crate persists
//! these types and the `api` crate wires them to HTTP.

pub mod access;
pub mod error;
pub mod execution;
pub mod roles;
pub mod types;
pub mod visibility;
pub mod workflow;
