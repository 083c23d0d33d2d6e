use clubdesk_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A row from the `procurement_buckets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bucket {
    pub id: Uuid,
    pub description: String,
    pub created_by: Uuid,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `item_requests` table. Costs are integer cents.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemRequest {
    pub id: Uuid,
    pub bucket_id: Uuid,
    pub requested_by: Uuid,
    pub item_name: String,
    pub justification: String,
    pub quantity: i32,
    pub estimated_cost_cents: i64,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cost summary over a bucket's item requests, in cents.
///
/// `estimated` sums every request; `approved` sums only approved (or later)
/// ones. Both are quantity-weighted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BucketTotals {
    pub estimated_total_cents: i64,
    pub approved_total_cents: i64,
}

/// DTO for `POST /api/v1/buckets`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBucket {
    #[validate(length(min = 3, max = 200))]
    pub description: String,
}

/// DTO for `POST /api/v1/buckets/{id}/items`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 120))]
    pub item_name: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub justification: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(range(min = 0))]
    pub estimated_cost_cents: i64,
}
