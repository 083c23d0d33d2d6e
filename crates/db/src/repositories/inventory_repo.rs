//! Repository for `inventory_items` and `inventory_requests`.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::inventory::{
    CreateInventoryItem, CreateInventoryRequest, InventoryItem, InventoryRequest,
};

const ITEM_COLUMNS: &str = "id, name, available_quantity, is_perishable, created_at, updated_at";

const REQUEST_COLUMNS: &str =
    "id, project_id, item_id, requested_by, quantity, status, created_at, updated_at";

/// Provides access to inventory stock and project inventory requests.
pub struct InventoryRepo;

impl InventoryRepo {
    /// Insert a new stock item.
    pub async fn create_item(
        pool: &PgPool,
        input: &CreateInventoryItem,
    ) -> Result<InventoryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory_items (name, available_quantity, is_perishable) \
             VALUES ($1, $2, $3) \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(&input.name)
            .bind(input.available_quantity)
            .bind(input.is_perishable)
            .fetch_one(pool)
            .await
    }

    /// List all stock items by name.
    pub async fn list_items(pool: &PgPool) -> Result<Vec<InventoryItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM inventory_items ORDER BY name ASC");
        sqlx::query_as::<_, InventoryItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a stock item by id.
    pub async fn find_item(pool: &PgPool, id: Uuid) -> Result<Option<InventoryItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1");
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create an inventory request against a project. The insert is guarded
    /// in SQL: the requester must be a project member and the project must
    /// still be accepting requests (`pending_approval` or `active`). Returns
    /// `None` when the guard fails.
    pub async fn create_request(
        pool: &PgPool,
        project_id: Uuid,
        requested_by: Uuid,
        input: &CreateInventoryRequest,
    ) -> Result<Option<InventoryRequest>, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory_requests (project_id, item_id, requested_by, quantity) \
             SELECT $1, $2, $3, $4 \
             WHERE EXISTS ( \
                 SELECT 1 FROM project_members \
                 WHERE project_id = $1 AND user_id = $3 \
             ) AND EXISTS ( \
                 SELECT 1 FROM projects \
                 WHERE id = $1 AND status IN ('pending_approval', 'active') \
             ) \
             RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, InventoryRequest>(&query)
            .bind(project_id)
            .bind(input.item_id)
            .bind(requested_by)
            .bind(input.quantity)
            .fetch_optional(pool)
            .await
    }

    /// List a project's inventory requests, oldest first.
    pub async fn list_requests_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<InventoryRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM inventory_requests \
             WHERE project_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, InventoryRequest>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List every request awaiting physical return, oldest first.
    pub async fn list_pending_returns(pool: &PgPool) -> Result<Vec<InventoryRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM inventory_requests \
             WHERE status = 'pending_return' ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, InventoryRequest>(&query)
            .fetch_all(pool)
            .await
    }

    /// Confirm that the given requests were physically returned: each row
    /// moves `pending_return -> returned` and its quantity is added back to
    /// stock. Runs in one transaction; if any id is not in `pending_return`
    /// the whole batch rolls back and `Ok(false)` is returned.
    pub async fn confirm_returns(
        pool: &PgPool,
        request_ids: &[Uuid],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE inventory_requests \
             SET status = 'returned', updated_at = NOW() \
             WHERE id = ANY($1) AND status = 'pending_return'",
        )
        .bind(request_ids)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated != request_ids.len() as u64 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE inventory_items i \
             SET available_quantity = available_quantity + r.total, updated_at = NOW() \
             FROM ( \
                 SELECT item_id, SUM(quantity)::INT AS total \
                 FROM inventory_requests WHERE id = ANY($1) \
                 GROUP BY item_id \
             ) r \
             WHERE i.id = r.item_id",
        )
        .bind(request_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
