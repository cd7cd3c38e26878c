//! Workflow descriptor row and insert DTO.

use flowgate_core::error::CoreError;
use flowgate_core::execution::ExecutionTarget;
use flowgate_core::types::{ActorId, ProjectId, Timestamp, WorkflowId};
use flowgate_core::workflow::{HttpMethod, Platform, UpdateWorkflowRequest, ValidatedWorkflow};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `workflows` table.
///
/// The enumerated columns are stored as text and guarded by CHECK
/// constraints; [`Workflow::execution_target`] parses them back.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workflow {
    pub workflow_id: WorkflowId,
    pub workflow_name: String,
    pub description: String,
    pub source: String,
    pub template_name: String,
    pub http_method: String,
    pub base_url: String,
    pub bearer_token: String,
    pub external_workflow_id: String,
    pub parameters: serde_json::Value,
    pub headers: serde_json::Value,
    pub project_id: ProjectId,
    pub creator_did: ActorId,
    pub is_shared: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Workflow {
    /// Borrow the fields the execution engine needs.
    ///
    /// Fails only if a stored enum value escaped the schema constraints.
    pub fn execution_target(&self) -> Result<ExecutionTarget<'_>, CoreError> {
        let platform: Platform = self.source.parse().map_err(|_| {
            CoreError::Internal(format!("workflow {} has invalid source", self.workflow_id))
        })?;
        let method: HttpMethod = self.http_method.parse().map_err(|_| {
            CoreError::Internal(format!(
                "workflow {} has invalid http_method",
                self.workflow_id
            ))
        })?;
        Ok(ExecutionTarget {
            platform,
            method,
            base_url: &self.base_url,
            bearer_token: &self.bearer_token,
            external_workflow_id: &self.external_workflow_id,
            default_parameters: &self.parameters,
            default_headers: &self.headers,
        })
    }
}

// ---------------------------------------------------------------------------
// Create DTO (internal, used by repository)
// ---------------------------------------------------------------------------

/// Input for inserting a workflow row.
#[derive(Debug, Clone)]
pub struct CreateWorkflow {
    pub fields: ValidatedWorkflow,
    pub creator_did: ActorId,
}

// ---------------------------------------------------------------------------
// Update assignments
// ---------------------------------------------------------------------------

/// A bound value for one column of a sparse update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Json(&'a serde_json::Value),
}

/// Column assignments for the fields present in `input`, in column order.
///
/// Empty when nothing was supplied; the repository then skips the UPDATE.
pub fn update_assignments(input: &UpdateWorkflowRequest) -> Vec<(&'static str, FieldValue<'_>)> {
    let text_fields = [
        ("workflow_name", &input.workflow_name),
        ("description", &input.description),
        ("source", &input.source),
        ("template_name", &input.template_name),
        ("http_method", &input.http_method),
        ("base_url", &input.base_url),
        ("bearer_token", &input.bearer_token),
        ("external_workflow_id", &input.external_workflow_id),
    ];
    let json_fields = [("parameters", &input.parameters), ("headers", &input.headers)];

    let mut assignments: Vec<(&'static str, FieldValue<'_>)> = text_fields
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|v| (column, FieldValue::Text(v))))
        .collect();
    assignments.extend(
        json_fields
            .into_iter()
            .filter_map(|(column, value)| value.as_ref().map(|v| (column, FieldValue::Json(v)))),
    );
    assignments
}
