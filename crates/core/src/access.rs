//! Per-project access predicates and the per-operation policy table.
//!
//! The store answers one question per request (the actor's role in a
//! project, if any). Everything else is decided here from that answer plus
//! the workflow record, so the policy can be tested without a database.

use crate::roles::ROLE_ADMIN;

/// What an actor may do in one project, derived from its membership row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectAccess {
    /// A membership row exists (any role).
    pub can_read: bool,
    /// A membership row exists with role `admin`.
    pub can_administer: bool,
}

impl ProjectAccess {
    /// No membership row.
    pub const NONE: ProjectAccess = ProjectAccess {
        can_read: false,
        can_administer: false,
    };

    /// Build from the role stored for (actor, project), if any.
    pub fn from_role(role: Option<&str>) -> Self {
        match role {
            None => Self::NONE,
            Some(role) => ProjectAccess {
                can_read: true,
                can_administer: role == ROLE_ADMIN,
            },
        }
    }
}

/// True iff the actor created the workflow. Purely structural.
pub fn is_creator(creator_did: &str, actor: &str) -> bool {
    creator_did == actor
}

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Update,
    Delete,
    Execute,
    Share,
    Hide,
}

impl Operation {
    /// Message returned with a 403 for this operation.
    pub fn denial_message(&self) -> &'static str {
        match self {
            Operation::Create | Operation::List => "Access denied to this project",
            Operation::Update => "Only admin or creator can update this workflow",
            Operation::Delete => "Only admin or creator can delete this workflow",
            Operation::Execute => "Access denied to this workflow",
            Operation::Share => "Only project admin can share workflows",
            Operation::Hide => "Only project admin can hide workflows",
        }
    }
}

/// Facts about the workflow an operation targets.
///
/// `None` for project-scoped operations (create, list, hide) where the
/// decision depends only on the target project.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowFacts {
    pub is_creator: bool,
    pub is_shared: bool,
}

/// Decide whether `op` is allowed.
///
/// `access` is the actor's access to the project the table keys on: the
/// target project for create/list/hide, the workflow's owning project for
/// everything else.
pub fn is_allowed(op: Operation, access: ProjectAccess, workflow: Option<WorkflowFacts>) -> bool {
    let facts = workflow.unwrap_or(WorkflowFacts {
        is_creator: false,
        is_shared: false,
    });
    match op {
        Operation::Create | Operation::List => access.can_read,
        Operation::Update | Operation::Delete => access.can_administer || facts.is_creator,
        Operation::Execute => access.can_read || facts.is_shared,
        Operation::Share | Operation::Hide => access.can_administer,
    }
}
