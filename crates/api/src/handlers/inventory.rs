//! Handlers for the `/inventory` resource: stock items and return
//! confirmation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use clubdesk_core::error::CoreError;
use clubdesk_db::models::inventory::{ConfirmReturns, CreateInventoryItem, InventoryItem, InventoryRequest};
use clubdesk_db::repositories::InventoryRepo;
use clubdesk_events::DomainEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireInventoryManager;
use crate::state::AppState;

/// GET /api/v1/inventory
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = InventoryRepo::list_items(&state.pool).await?;
    Ok(Json(items))
}

/// POST /api/v1/inventory (inventory managers)
pub async fn create(
    RequireInventoryManager(actor): RequireInventoryManager,
    State(state): State<AppState>,
    Json(input): Json<CreateInventoryItem>,
) -> AppResult<(StatusCode, Json<InventoryItem>)> {
    input.validate()?;
    let item = InventoryRepo::create_item(&state.pool, &input).await?;

    state.event_bus.publish(
        DomainEvent::new("inventory_item.created")
            .with_entity("inventory_item", item.id)
            .with_actor(actor.uid),
    );
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/inventory/returns -- requests awaiting physical return.
pub async fn list_pending_returns(
    RequireInventoryManager(_actor): RequireInventoryManager,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryRequest>>> {
    let pending = InventoryRepo::list_pending_returns(&state.pool).await?;
    Ok(Json(pending))
}

/// POST /api/v1/inventory/returns -- confirm items physically returned.
///
/// All-or-nothing: every listed request must still be awaiting return.
pub async fn confirm_returns(
    RequireInventoryManager(actor): RequireInventoryManager,
    State(state): State<AppState>,
    Json(input): Json<ConfirmReturns>,
) -> AppResult<StatusCode> {
    input.validate()?;
    let confirmed = InventoryRepo::confirm_returns(&state.pool, &input.request_ids).await?;
    if !confirmed {
        return Err(AppError::Core(CoreError::Validation(
            "One or more requests are not awaiting return".into(),
        )));
    }

    state
        .event_bus
        .publish(DomainEvent::new("inventory.returns_confirmed").with_actor(actor.uid));
    Ok(StatusCode::NO_CONTENT)
}
