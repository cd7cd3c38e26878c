//! Workflow execution engine.
//!
//! Request synthesis lives in [`flowgate_core::execution`]; this module
//! performs the network call and captures the upstream response.

pub mod dispatcher;

pub use dispatcher::{execute, Dispatcher};

/// The upstream call failed before a response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Transport(String),
}
