//! Role and capability extractors.
//!
//! Each extractor wraps [`CurrentActor`] and rejects requests that do not
//! meet the requirement, so route signatures state their authorization up
//! front. Transition endpoints do not use these; there the policy itself is
//! the authority.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use clubdesk_core::actor::{Actor, Capability, Role};
use clubdesk_core::error::CoreError;

use super::auth::CurrentActor;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 otherwise.
pub struct RequireAdmin(pub Actor);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentActor(actor) = CurrentActor::from_request_parts(parts, state).await?;
        if actor.role != Role::Admin {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(actor))
    }
}

/// Requires the manage-inventory capability. Rejects with 403 otherwise.
pub struct RequireInventoryManager(pub Actor);

impl FromRequestParts<AppState> for RequireInventoryManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentActor(actor) = CurrentActor::from_request_parts(parts, state).await?;
        if !actor.has(Capability::ManageInventory) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Manage-inventory capability required".into(),
            )));
        }
        Ok(RequireInventoryManager(actor))
    }
}
