//! Read-only access to the `user_projects` table.

use flowgate_core::access::ProjectAccess;
use sqlx::PgPool;

use crate::models::membership::Membership;

/// Looks up project membership for access decisions.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Find the membership row for (actor, project), if any.
    pub async fn find(
        pool: &PgPool,
        user_did: &str,
        project_id: &str,
    ) -> Result<Option<Membership>, sqlx::Error> {
        sqlx::query_as::<_, Membership>(
            "SELECT user_did, project_id, role FROM user_projects \
             WHERE user_did = $1 AND project_id = $2",
        )
        .bind(user_did)
        .bind(project_id)
        .fetch_optional(pool)
        .await
    }

    /// Resolve what the actor may do in the project.
    ///
    /// A store error is returned as-is so callers can tell an infrastructure
    /// fault apart from "no membership".
    pub async fn access(
        pool: &PgPool,
        user_did: &str,
        project_id: &str,
    ) -> Result<ProjectAccess, sqlx::Error> {
        let membership = Self::find(pool, user_did, project_id).await?;
        Ok(ProjectAccess::from_role(
            membership.as_ref().map(|m| m.role.as_str()),
        ))
    }
}
