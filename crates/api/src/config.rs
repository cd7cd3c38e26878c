use crate::auth::jwt::JwtConfig;

/// Default outbound execution timeout in seconds.
const DEFAULT_EXECUTION_TIMEOUT_SECS: u64 = 30;
/// Default HTTP request timeout in seconds. Must exceed the execution timeout.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// JWT verification settings.
    pub jwt: JwtConfig,
    /// Outbound execution settings.
    pub engine: EngineConfig,
}

/// Settings for calls to third-party workflow platforms.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Per-execution timeout in seconds (default: `30`).
    pub execution_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            execution_timeout_secs: DEFAULT_EXECUTION_TIMEOUT_SECS,
        }
    }
}

impl EngineConfig {
    /// Load from `EXECUTION_TIMEOUT_SECS` (default: `30`).
    pub fn from_env() -> Self {
        let execution_timeout_secs: u64 =
            env_or("EXECUTION_TIMEOUT_SECS", DEFAULT_EXECUTION_TIMEOUT_SECS)
                .expect("EXECUTION_TIMEOUT_SECS must be a valid u64");
        assert!(
            execution_timeout_secs > 0,
            "EXECUTION_TIMEOUT_SECS must be greater than zero"
        );
        Self {
            execution_timeout_secs,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `60`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    ///
    /// See [`JwtConfig::from_env`] and [`EngineConfig::from_env`] for the
    /// nested sections.
    ///
    /// # Panics
    ///
    /// Panics on malformed values, or if the request timeout does not
    /// exceed the execution timeout.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_or("PORT", 3000).expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 =
            env_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)
                .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", 30)
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let engine = EngineConfig::from_env();

        assert!(
            request_timeout_secs > engine.execution_timeout_secs,
            "REQUEST_TIMEOUT_SECS must be greater than EXECUTION_TIMEOUT_SECS"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            engine,
        }
    }
}

/// Database settings, read separately because the pool is built before the
/// server config is needed.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Pool size (default: `10`).
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Load from `DATABASE_URL` (required) and `DB_MAX_CONNECTIONS`.
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let max_connections: u32 =
            env_or("DB_MAX_CONNECTIONS", 10).expect("DB_MAX_CONNECTIONS must be a valid u32");
        Self {
            url,
            max_connections,
        }
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, T::Err> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse(),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
