//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use flowgate_core::error::CoreError;
use flowgate_core::types::ActorId;

use crate::auth::jwt::authenticate;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated actor extracted from the `Authorization` header.
///
/// Place it first in a handler's argument list so credential failures are
/// reported before path or body validation:
///
/// ```ignore
/// async fn my_handler(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<()>> {
///     tracing::info!(actor = %user.actor_did, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The actor's decentralized id (from `claims.did`).
    pub actor_did: ActorId,
    /// Display name, logged alongside the did when the token carries one.
    pub username: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let claims = authenticate(header, &state.config.jwt).map_err(|err| {
            tracing::debug!(error = %err, "Rejected request credential");
            AppError::Core(CoreError::from(err))
        })?;

        Ok(AuthUser {
            actor_did: claims.did,
            username: claims.username,
        })
    }
}
