use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and the HTTP client are reference-counted
/// internally and the config sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: flowgate_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound client for third-party workflow platforms.
    pub http: reqwest::Client,
}
