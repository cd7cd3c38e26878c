//! Project-scoped workflow routes.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::workflow;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /{project_id}/workflows                      -> list_by_project
/// PUT    /{project_id}/workflows/{workflow_id}/hide   -> hide
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{project_id}/workflows", get(workflow::list_by_project))
        .route(
            "/{project_id}/workflows/{workflow_id}/hide",
            put(workflow::hide),
        )
}
