//! Authentication extractors.
//!
//! [`AuthUser`] proves a valid Bearer token; [`CurrentActor`] additionally
//! re-reads the user row so the policy always sees the actor's current role
//! and capability set, never what was baked into the token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use clubdesk_core::actor::Actor;
use uuid::Uuid;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: Uuid,
    /// The role claim carried by the token.
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing Authorization header".into()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Authentication(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            )
        })?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Authentication("Invalid or expired token".into()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// The acting user as the policy layer sees them, built from a fresh read of
/// the user row. A revoked capability takes effect on the next request, not
/// at token expiry.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let user = clubdesk_db::repositories::UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .ok_or_else(|| AppError::Authentication("Unknown user".into()))?;
        Ok(CurrentActor(user.to_actor()))
    }
}
