//! Which workflows an actor sees when listing a project.
//!
//! The repository evaluates the same rule in SQL; this is the reference
//! predicate it must agree with.

use crate::access::ProjectAccess;

/// Inputs to the visibility rule for one (project, workflow) pair.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityInput<'a> {
    /// Project being listed.
    pub project_id: &'a str,
    /// Project that owns the workflow.
    pub owner_project_id: &'a str,
    /// The workflow's global shared flag.
    pub is_shared: bool,
    /// Hide override for (project_id, workflow), `None` when no row exists.
    pub hidden_override: Option<bool>,
}

/// A workflow is visible in P iff it is owned by P and the actor can read P,
/// or it is shared, and P has not hidden it.
pub fn is_visible(input: VisibilityInput<'_>, access: ProjectAccess) -> bool {
    let reachable = (input.owner_project_id == input.project_id && access.can_read)
        || input.is_shared;
    let hidden = input.hidden_override.unwrap_or(false);
    reachable && !hidden
}
