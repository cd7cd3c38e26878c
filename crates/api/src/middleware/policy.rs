//! Project-scoped authorization checks.
//!
//! Each check performs at most one membership lookup and then defers to
//! the pure decision table in [`flowgate_core::access`]. A failed lookup
//! is surfaced as a store error (500), never as a denial.

use flowgate_core::access::{is_allowed, is_creator, Operation, ProjectAccess, WorkflowFacts};
use flowgate_core::error::CoreError;
use flowgate_db::models::workflow::Workflow;
use flowgate_db::repositories::MembershipRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Reject with 403 unless `op` is allowed for this access and workflow.
pub fn require(
    op: Operation,
    access: ProjectAccess,
    workflow: Option<WorkflowFacts>,
) -> AppResult<()> {
    if is_allowed(op, access, workflow) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            op.denial_message().to_string(),
        )))
    }
}

/// Authorize a project-scoped operation (create, list, hide) against the
/// target project.
pub async fn authorize_project(
    pool: &PgPool,
    op: Operation,
    actor: &str,
    project_id: &str,
) -> AppResult<ProjectAccess> {
    let access = MembershipRepo::access(pool, actor, project_id).await?;
    require(op, access, None)?;
    Ok(access)
}

/// Authorize a workflow-scoped operation against the workflow's owning
/// project and its creator/shared facts.
pub async fn authorize_workflow(
    pool: &PgPool,
    op: Operation,
    actor: &str,
    workflow: &Workflow,
) -> AppResult<()> {
    let access = MembershipRepo::access(pool, actor, &workflow.project_id).await?;
    let facts = WorkflowFacts {
        is_creator: is_creator(&workflow.creator_did, actor),
        is_shared: workflow.is_shared,
    };
    require(op, access, Some(facts))
}
