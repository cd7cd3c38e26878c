//! Repository for the `project_workflow_settings` table.
//!
//! Sparse per-project overrides; a missing row means "not hidden".

use flowgate_core::types::WorkflowId;
use sqlx::PgPool;

use crate::models::project_workflow_setting::ProjectWorkflowSetting;

/// Column list for the `project_workflow_settings` table.
const COLUMNS: &str = "project_id, workflow_id, is_hidden, created_at, updated_at";

/// Provides data access for per-project visibility overrides.
pub struct ProjectWorkflowSettingRepo;

impl ProjectWorkflowSettingRepo {
    /// Insert or update the hidden flag for (project, workflow).
    pub async fn upsert_hidden(
        pool: &PgPool,
        project_id: &str,
        workflow_id: WorkflowId,
        is_hidden: bool,
    ) -> Result<ProjectWorkflowSetting, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_workflow_settings (project_id, workflow_id, is_hidden) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (project_id, workflow_id) \
             DO UPDATE SET is_hidden = EXCLUDED.is_hidden, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectWorkflowSetting>(&query)
            .bind(project_id)
            .bind(workflow_id)
            .bind(is_hidden)
            .fetch_one(pool)
            .await
    }

    /// Find the override row for (project, workflow).
    pub async fn find(
        pool: &PgPool,
        project_id: &str,
        workflow_id: WorkflowId,
    ) -> Result<Option<ProjectWorkflowSetting>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_workflow_settings \
             WHERE project_id = $1 AND workflow_id = $2"
        );
        sqlx::query_as::<_, ProjectWorkflowSetting>(&query)
            .bind(project_id)
            .bind(workflow_id)
            .fetch_optional(pool)
            .await
    }
}
