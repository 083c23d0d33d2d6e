//! JWT access-token validation.
//!
//! Tokens are HS256-signed JWTs carrying a [`Claims`] payload. Token
//! issuance belongs to the external identity provider; this module only
//! validates what arrives in the `Authorization` header. [`issue_token`]
//! exists for integration tests and local tooling.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: Uuid,
    /// The user's role name at issue time (e.g. `"admin"`, `"member"`).
    /// Informational only; authorization re-reads the user row per request.
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier for audit.
    pub jti: String,
}

/// Configuration for JWT validation (and test-token issuance).
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to verify tokens.
    pub secret: String,
    /// Token lifetime in minutes when issuing locally (default: 60).
    pub token_expiry_mins: i64,
}

const DEFAULT_TOKEN_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `JWT_SECRET`            | **yes**  | --      |
    /// | `JWT_TOKEN_EXPIRY_MINS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let token_expiry_mins: i64 = std::env::var("JWT_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_TOKEN_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            token_expiry_mins,
        }
    }
}

/// Issue an HS256 token for the given user.
pub fn issue_token(
    user_id: Uuid,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + config.token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
