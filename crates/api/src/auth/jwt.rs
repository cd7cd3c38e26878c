//! Bearer credential parsing and JWT verification.
//!
//! Tokens are HS256-signed JWTs issued by the account service; this crate
//! only verifies them. The payload carries the actor's decentralized id in
//! `did` and an optional display `username`.

use flowgate_core::error::CoreError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims carried by every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The actor's decentralized identifier.
    pub did: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to verify tokens.
    pub secret: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var      | Required | Default |
    /// |--------------|----------|---------|
    /// | `JWT_SECRET` | **yes**  | --      |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Why a request's credential was rejected. Both map to 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// Missing header, or not exactly `Bearer <token>`.
    #[error("Invalid authorization header")]
    Malformed,
    /// Bad signature, expired, or missing required claims.
    #[error("Invalid or expired token")]
    Invalid,
}

impl From<CredentialError> for CoreError {
    fn from(err: CredentialError) -> Self {
        CoreError::Unauthorized(err.to_string())
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// The value must split on single spaces into exactly two parts, the first
/// being the literal `Bearer`.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, CredentialError> {
    let header = header.ok_or(CredentialError::Malformed)?;
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(CredentialError::Malformed),
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature and `exp` with no clock leeway. A token without a
/// non-empty `did` is rejected.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, CredentialError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|_| CredentialError::Invalid)?;

    if token_data.claims.did.is_empty() {
        return Err(CredentialError::Invalid);
    }
    Ok(token_data.claims)
}

/// Run the full capability check on a raw header value.
pub fn authenticate(header: Option<&str>, config: &JwtConfig) -> Result<Claims, CredentialError> {
    let token = extract_bearer(header)?;
    validate_token(token, config)
}
