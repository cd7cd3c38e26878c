//! Row structs and insert DTOs.
//!
//! Request bodies live in `flowgate_core`; the types here mirror table rows.

pub mod membership;
pub mod project_workflow_setting;
pub mod workflow;
