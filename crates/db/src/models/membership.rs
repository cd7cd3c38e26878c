//! Project membership rows (`user_projects`). Read-only for this service.

use flowgate_core::types::{ActorId, ProjectId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Membership {
    pub user_did: ActorId,
    pub project_id: ProjectId,
    /// `member` or `admin`, see [`flowgate_core::roles`].
    pub role: String,
}
