//! Handlers for the workflow resource.
//!
//! Every handler takes [`AuthUser`] first so credential failures are
//! reported before path or body validation. Authorization follows the
//! table in [`flowgate_core::access`].

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use flowgate_core::access::Operation;
use flowgate_core::error::CoreError;
use flowgate_core::execution::{ExecuteWorkflowRequest, ExecutionRecord};
use flowgate_core::types::{ProjectId, WorkflowId};
use flowgate_core::workflow::{
    CreateWorkflowRequest, HideWorkflowRequest, ShareWorkflowRequest, UpdateWorkflowRequest,
};
use flowgate_db::models::workflow::{CreateWorkflow, Workflow};
use flowgate_db::repositories::{ProjectWorkflowSettingRepo, WorkflowRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::engine::{self, Dispatcher};
use crate::error::{AppError, AppResult, INVALID_BODY};
use crate::middleware::auth::AuthUser;
use crate::middleware::policy::{authorize_project, authorize_workflow};
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CreatedWorkflow {
    pub workflow_id: WorkflowId,
    pub workflow_name: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatedWorkflow {
    pub workflow_id: WorkflowId,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SharedWorkflow {
    pub workflow_id: WorkflowId,
    pub is_shared: bool,
}

#[derive(Debug, Serialize)]
pub struct HiddenWorkflow {
    pub project_id: ProjectId,
    pub workflow_id: WorkflowId,
    pub is_hidden: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a workflow id path segment; anything but a UUID is a 400.
fn parse_workflow_id(raw: &str) -> AppResult<WorkflowId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid workflow ID".into()))
}

async fn find_workflow(pool: &PgPool, id: WorkflowId) -> AppResult<Workflow> {
    WorkflowRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Workflow",
                id: id.to_string(),
            })
        })
}

/// A non-empty update that touched no row lost a race with a delete.
fn ensure_updated(id: WorkflowId, changed: bool, input: &UpdateWorkflowRequest) -> AppResult<()> {
    if changed || input.is_empty() {
        return Ok(());
    }
    Err(AppError::Core(CoreError::NotFound {
        entity: "Workflow",
        id: id.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/workflows
///
/// Registers a descriptor in `project_id`; the caller becomes its creator.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateWorkflowRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<CreatedWorkflow>>> {
    let Json(input) = payload?;
    let fields = input.into_validated()?;

    authorize_project(
        &state.pool,
        Operation::Create,
        &user.actor_did,
        &fields.project_id,
    )
    .await?;

    let workflow = WorkflowRepo::create(
        &state.pool,
        &CreateWorkflow {
            fields,
            creator_did: user.actor_did.clone(),
        },
    )
    .await?;

    tracing::info!(
        workflow_id = %workflow.workflow_id,
        project_id = %workflow.project_id,
        source = %workflow.source,
        actor = %user.actor_did,
        username = ?user.username,
        "Workflow created",
    );

    Ok(Json(ApiResponse::ok(CreatedWorkflow {
        workflow_id: workflow.workflow_id,
        workflow_name: workflow.workflow_name,
    })))
}

/// GET /api/v1/projects/{project_id}/workflows
///
/// Workflows owned by the project plus shared ones, minus those the
/// project has hidden. Newest first.
pub async fn list_by_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> AppResult<Json<ApiResponse<Vec<Workflow>>>> {
    authorize_project(&state.pool, Operation::List, &user.actor_did, &project_id).await?;

    let workflows = WorkflowRepo::list_visible(&state.pool, &project_id).await?;
    tracing::debug!(project_id = %project_id, count = workflows.len(), "Listed workflows");
    Ok(Json(ApiResponse::ok(workflows)))
}

/// PUT /api/v1/workflows/{id}
///
/// Sparse update. An empty body succeeds without touching the row.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateWorkflowRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<UpdatedWorkflow>>> {
    let id = parse_workflow_id(&id)?;
    let Json(input) = payload?;

    let workflow = find_workflow(&state.pool, id).await?;
    authorize_workflow(&state.pool, Operation::Update, &user.actor_did, &workflow).await?;
    input.validate_fields()?;

    let changed = WorkflowRepo::update(&state.pool, id, &input).await?;
    ensure_updated(id, changed, &input)?;
    tracing::info!(
        workflow_id = %id,
        changed,
        actor = %user.actor_did,
        username = ?user.username,
        "Workflow updated",
    );

    Ok(Json(ApiResponse::ok(UpdatedWorkflow {
        workflow_id: id,
        message: "Workflow updated successfully",
    })))
}

/// DELETE /api/v1/workflows/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let id = parse_workflow_id(&id)?;

    let workflow = find_workflow(&state.pool, id).await?;
    authorize_workflow(&state.pool, Operation::Delete, &user.actor_did, &workflow).await?;

    if !WorkflowRepo::delete(&state.pool, id).await? {
        // Raced with another delete.
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id: id.to_string(),
        }));
    }
    tracing::info!(
        workflow_id = %id,
        actor = %user.actor_did,
        username = ?user.username,
        "Workflow deleted",
    );

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Workflow deleted successfully",
    })))
}

/// POST /api/v1/workflows/{id}/execute
///
/// Calls the third-party platform and returns the outbound request
/// alongside the captured response. An empty body means "no overrides".
pub async fn execute(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<ApiResponse<ExecutionRecord>>> {
    let id = parse_workflow_id(&id)?;
    let overrides: ExecuteWorkflowRequest = if body.is_empty() {
        ExecuteWorkflowRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|_| AppError::BadRequest(INVALID_BODY.into()))?
    };

    let workflow = find_workflow(&state.pool, id).await?;
    authorize_workflow(&state.pool, Operation::Execute, &user.actor_did, &workflow).await?;
    let target = workflow.execution_target()?;

    // Only pool-free values cross the await below; no connection is held.
    let dispatcher = Dispatcher::new(
        state.http.clone(),
        Duration::from_secs(state.config.engine.execution_timeout_secs),
    );
    let record = engine::execute(&dispatcher, target, &overrides).await?;

    tracing::info!(
        workflow_id = %id,
        source = %workflow.source,
        status = record.response.status,
        actor = %user.actor_did,
        username = ?user.username,
        "Workflow executed",
    );

    Ok(Json(ApiResponse::ok(record)))
}

/// PUT /api/v1/workflows/{id}/share
pub async fn share(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ShareWorkflowRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<SharedWorkflow>>> {
    let id = parse_workflow_id(&id)?;
    let Json(input) = payload?;

    let workflow = find_workflow(&state.pool, id).await?;
    authorize_workflow(&state.pool, Operation::Share, &user.actor_did, &workflow).await?;

    WorkflowRepo::set_shared(&state.pool, id, input.is_shared).await?;
    tracing::info!(
        workflow_id = %id,
        is_shared = input.is_shared,
        actor = %user.actor_did,
        "Workflow sharing changed",
    );

    Ok(Json(ApiResponse::ok(SharedWorkflow {
        workflow_id: id,
        is_shared: input.is_shared,
    })))
}

/// PUT /api/v1/projects/{project_id}/workflows/{workflow_id}/hide
///
/// Project-local visibility override. Requires admin of the path project,
/// not of the workflow's owner.
pub async fn hide(
    user: AuthUser,
    State(state): State<AppState>,
    Path((project_id, workflow_id)): Path<(ProjectId, String)>,
    payload: Result<Json<HideWorkflowRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<HiddenWorkflow>>> {
    let workflow_id = parse_workflow_id(&workflow_id)?;
    let Json(input) = payload?;

    authorize_project(&state.pool, Operation::Hide, &user.actor_did, &project_id).await?;

    if !WorkflowRepo::exists(&state.pool, workflow_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id: workflow_id.to_string(),
        }));
    }

    let setting = ProjectWorkflowSettingRepo::upsert_hidden(
        &state.pool,
        &project_id,
        workflow_id,
        input.is_hidden,
    )
    .await?;
    tracing::info!(
        project_id = %project_id,
        workflow_id = %workflow_id,
        is_hidden = setting.is_hidden,
        actor = %user.actor_did,
        "Workflow visibility override set",
    );

    Ok(Json(ApiResponse::ok(HiddenWorkflow {
        project_id: setting.project_id,
        workflow_id: setting.workflow_id,
        is_hidden: setting.is_hidden,
    })))
}
