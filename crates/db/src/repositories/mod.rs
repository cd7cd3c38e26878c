//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod membership_repo;
pub mod project_workflow_setting_repo;
pub mod workflow_repo;

pub use membership_repo::MembershipRepo;
pub use project_workflow_setting_repo::ProjectWorkflowSettingRepo;
pub use workflow_repo::WorkflowRepo;
