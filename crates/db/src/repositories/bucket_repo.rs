//! Repository for the `procurement_buckets` and `bucket_members` tables.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::procurement::{Bucket, BucketTotals, CreateBucket};

const COLUMNS: &str = "id, description, created_by, status, created_at, updated_at";

/// Provides access to procurement buckets.
pub struct BucketRepo;

impl BucketRepo {
    /// Create an open bucket with the creator as its first member.
    pub async fn create(
        pool: &PgPool,
        created_by: Uuid,
        input: &CreateBucket,
    ) -> Result<Bucket, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO procurement_buckets (description, created_by) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        let bucket = sqlx::query_as::<_, Bucket>(&query)
            .bind(&input.description)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO bucket_members (bucket_id, user_id) VALUES ($1, $2)")
            .bind(bucket.id)
            .bind(created_by)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(bucket)
    }

    /// Find a bucket by its id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Bucket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM procurement_buckets WHERE id = $1");
        sqlx::query_as::<_, Bucket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all buckets, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Bucket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM procurement_buckets ORDER BY created_at DESC");
        sqlx::query_as::<_, Bucket>(&query).fetch_all(pool).await
    }

    /// Quantity-weighted cost totals over a bucket's item requests. The
    /// approved total counts requests that reached `approved` or a later
    /// status.
    pub async fn totals(pool: &PgPool, bucket_id: Uuid) -> Result<BucketTotals, sqlx::Error> {
        sqlx::query_as::<_, BucketTotals>(
            "SELECT \
                 COALESCE(SUM(estimated_cost_cents * quantity), 0)::BIGINT \
                     AS estimated_total_cents, \
                 COALESCE(SUM(estimated_cost_cents * quantity) \
                     FILTER (WHERE status IN ('approved', 'ordered', 'received')), 0)::BIGINT \
                     AS approved_total_cents \
             FROM item_requests WHERE bucket_id = $1",
        )
        .bind(bucket_id)
        .fetch_one(pool)
        .await
    }

    /// Member ids of a bucket.
    pub async fn member_ids(pool: &PgPool, bucket_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM bucket_members WHERE bucket_id = $1")
                .bind(bucket_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
