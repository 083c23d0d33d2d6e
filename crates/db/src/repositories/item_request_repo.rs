//! Repository for the `item_requests` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::procurement::{CreateItemRequest, ItemRequest};

const COLUMNS: &str = "id, bucket_id, requested_by, item_name, justification, quantity, \
    estimated_cost_cents, status, rejection_reason, created_at, updated_at";

/// Provides access to item requests inside procurement buckets.
pub struct ItemRequestRepo;

impl ItemRequestRepo {
    /// Add an item request to a bucket. The insert is guarded in SQL: the
    /// bucket must still be `open`. Returns `None` when it is not. On
    /// success the requester becomes a bucket member.
    pub async fn create(
        pool: &PgPool,
        bucket_id: Uuid,
        requested_by: Uuid,
        input: &CreateItemRequest,
    ) -> Result<Option<ItemRequest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO item_requests \
                 (bucket_id, requested_by, item_name, justification, quantity, \
                  estimated_cost_cents) \
             SELECT $1, $2, $3, $4, $5, $6 \
             WHERE EXISTS ( \
                 SELECT 1 FROM procurement_buckets WHERE id = $1 AND status = 'open' \
             ) \
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, ItemRequest>(&query)
            .bind(bucket_id)
            .bind(requested_by)
            .bind(&input.item_name)
            .bind(&input.justification)
            .bind(input.quantity)
            .bind(input.estimated_cost_cents)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(request) = request else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO bucket_members (bucket_id, user_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(bucket_id)
        .bind(requested_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(request))
    }

    /// Find an item request by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ItemRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM item_requests WHERE id = $1");
        sqlx::query_as::<_, ItemRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a bucket's item requests, oldest first.
    pub async fn list_for_bucket(
        pool: &PgPool,
        bucket_id: Uuid,
    ) -> Result<Vec<ItemRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM item_requests WHERE bucket_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, ItemRequest>(&query)
            .bind(bucket_id)
            .fetch_all(pool)
            .await
    }
}
