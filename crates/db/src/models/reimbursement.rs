use clubdesk_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A row from the `reimbursements` table. Amounts are integer cents.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reimbursement {
    pub id: Uuid,
    pub requested_by: Uuid,
    pub project_id: Option<Uuid>,
    pub amount_cents: i64,
    pub description: String,
    pub status: String,
    pub decided_at: Option<Timestamp>,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /api/v1/reimbursements`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReimbursement {
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub project_id: Option<Uuid>,
}
