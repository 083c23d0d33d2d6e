use clubdesk_core::actor::{Actor, Capability, Role};
use clubdesk_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub can_approve_projects: bool,
    pub can_approve_item_requests: bool,
    pub can_manage_inventory: bool,
    pub can_approve_reimbursements: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Build the explicit actor context the policy layer works with.
    pub fn to_actor(&self) -> Actor {
        let mut actor = Actor::new(self.id, Role::parse_or_member(&self.role));
        if self.can_approve_projects {
            actor = actor.with_capability(Capability::ApproveProjects);
        }
        if self.can_approve_item_requests {
            actor = actor.with_capability(Capability::ApproveItemRequests);
        }
        if self.can_manage_inventory {
            actor = actor.with_capability(Capability::ManageInventory);
        }
        if self.can_approve_reimbursements {
            actor = actor.with_capability(Capability::ApproveReimbursements);
        }
        actor
    }
}

/// DTO for creating a user via `POST /api/v1/users` (admin only).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// One of `admin`, `coordinator`, `member`. Unknown values are stored
    /// as-is and treated as `member`.
    pub role: Option<String>,
    #[serde(default)]
    pub can_approve_projects: bool,
    #[serde(default)]
    pub can_approve_item_requests: bool,
    #[serde(default)]
    pub can_manage_inventory: bool,
    #[serde(default)]
    pub can_approve_reimbursements: bool,
}
