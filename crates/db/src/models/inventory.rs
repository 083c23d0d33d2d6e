use clubdesk_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A row from the `inventory_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub available_quantity: i32,
    pub is_perishable: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `inventory_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryRequest {
    pub id: Uuid,
    pub project_id: Uuid,
    pub item_id: Uuid,
    pub requested_by: Uuid,
    pub quantity: i32,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /api/v1/inventory` (inventory managers).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInventoryItem {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 0))]
    pub available_quantity: i32,
    #[serde(default)]
    pub is_perishable: bool,
}

/// DTO for `POST /api/v1/projects/{id}/inventory-requests`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInventoryRequest {
    pub item_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// DTO for `POST /api/v1/inventory/returns`: the requests an inventory
/// manager confirms as physically returned.
#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmReturns {
    #[validate(length(min = 1))]
    pub request_ids: Vec<Uuid>,
}
