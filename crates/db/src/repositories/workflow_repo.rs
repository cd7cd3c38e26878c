//! Repository for the `workflows` table.

use flowgate_core::types::WorkflowId;
use flowgate_core::workflow::UpdateWorkflowRequest;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::workflow::{update_assignments, CreateWorkflow, FieldValue, Workflow};

/// Column list for workflows queries.
const COLUMNS: &str = "workflow_id, workflow_name, description, source, template_name, \
    http_method, base_url, bearer_token, external_workflow_id, parameters, headers, \
    project_id, creator_did, is_shared, created_at, updated_at";

/// Provides CRUD operations for workflow descriptors.
pub struct WorkflowRepo;

impl WorkflowRepo {
    /// Insert a new workflow, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateWorkflow) -> Result<Workflow, sqlx::Error> {
        let f = &input.fields;
        let query = format!(
            "INSERT INTO workflows
                (workflow_name, description, source, template_name, http_method,
                 base_url, bearer_token, external_workflow_id, parameters, headers,
                 project_id, creator_did)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workflow>(&query)
            .bind(&f.workflow_name)
            .bind(&f.description)
            .bind(f.source.as_str())
            .bind(f.template_name.as_str())
            .bind(f.http_method.as_str())
            .bind(&f.base_url)
            .bind(&f.bearer_token)
            .bind(&f.external_workflow_id)
            .bind(&f.parameters)
            .bind(&f.headers)
            .bind(&f.project_id)
            .bind(&input.creator_did)
            .fetch_one(pool)
            .await
    }

    /// Find a workflow by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: WorkflowId,
    ) -> Result<Option<Workflow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflows WHERE workflow_id = $1");
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a workflow with this id exists.
    pub async fn exists(pool: &PgPool, id: WorkflowId) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM workflows WHERE workflow_id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// List workflows visible in a project, newest first.
    ///
    /// Visible means owned by the project or globally shared, and not hidden
    /// by an override row for this project. Callers must already have
    /// checked that the actor can read the project.
    pub async fn list_visible(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<Workflow>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM workflows w \
             LEFT JOIN project_workflow_settings pws \
                ON pws.workflow_id = w.workflow_id AND pws.project_id = $1 \
             WHERE (w.project_id = $1 OR w.is_shared = true) \
               AND (pws.is_hidden IS NULL OR pws.is_hidden = false) \
             ORDER BY w.created_at DESC",
            cols = prefixed_columns("w"),
        );
        sqlx::query_as::<_, Workflow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a sparse update. Only supplied fields change.
    ///
    /// Returns `false` without touching the row (or `updated_at`) when no
    /// field was supplied, otherwise whether a row was updated.
    pub async fn update(
        pool: &PgPool,
        id: WorkflowId,
        input: &UpdateWorkflowRequest,
    ) -> Result<bool, sqlx::Error> {
        let assignments = update_assignments(input);
        if assignments.is_empty() {
            return Ok(false);
        }
        tracing::debug!(
            workflow_id = %id,
            columns = ?assignments.iter().map(|(c, _)| *c).collect::<Vec<_>>(),
            "Applying sparse workflow update",
        );

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE workflows SET ");
        let mut set = builder.separated(", ");
        for (column, value) in assignments {
            set.push(column).push_unseparated(" = ");
            match value {
                FieldValue::Text(v) => set.push_bind_unseparated(v),
                FieldValue::Json(v) => set.push_bind_unseparated(v),
            };
        }
        set.push("updated_at = NOW()");
        builder.push(" WHERE workflow_id = ");
        builder.push_bind(id);

        let result = builder.build().execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the global shared flag. Returns `true` if a row was updated.
    pub async fn set_shared(
        pool: &PgPool,
        id: WorkflowId,
        is_shared: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE workflows SET is_shared = $1 WHERE workflow_id = $2")
            .bind(is_shared)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a workflow by its id. Returns `true` if a row was deleted.
    ///
    /// Visibility overrides for the workflow go with it (`ON DELETE CASCADE`).
    pub async fn delete(pool: &PgPool, id: WorkflowId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflows WHERE workflow_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// `COLUMNS` qualified with a table alias, for joins.
fn prefixed_columns(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
