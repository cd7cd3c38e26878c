//! Route definitions for the `/workflows` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::workflow;
use crate::state::AppState;

/// Routes mounted at `/workflows`.
///
/// ```text
/// POST   /                -> create
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// POST   /{id}/execute    -> execute
/// PUT    /{id}/share      -> share
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(workflow::create))
        .route("/{id}", put(workflow::update).delete(workflow::delete))
        .route("/{id}/execute", post(workflow::execute))
        .route("/{id}/share", put(workflow::share))
}
