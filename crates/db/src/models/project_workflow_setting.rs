//! Per-project visibility override for a workflow.

use flowgate_core::types::{ProjectId, Timestamp, WorkflowId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `project_workflow_settings` table.
///
/// Absence of a row for (project, workflow) means "not hidden".
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWorkflowSetting {
    pub project_id: ProjectId,
    pub workflow_id: WorkflowId,
    pub is_hidden: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
