pub mod health;
pub mod project;
pub mod workflow;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /workflows                                       create
/// /workflows/{id}                                  update, delete
/// /workflows/{id}/execute                          execute (POST)
/// /workflows/{id}/share                            share/unshare (PUT)
///
/// /projects/{project_id}/workflows                 list visible
/// /projects/{project_id}/workflows/{id}/hide       hide/unhide (PUT)
/// ```
///
/// Every route requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/workflows", workflow::router())
        .nest("/projects", project::router())
}
