//! Repository for the `reimbursements` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::reimbursement::{CreateReimbursement, Reimbursement};

const COLUMNS: &str = "id, requested_by, project_id, amount_cents, description, status, \
    decided_at, paid_at, created_at, updated_at";

/// Provides access to reimbursement requests.
pub struct ReimbursementRepo;

impl ReimbursementRepo {
    /// File a new reimbursement in `pending`.
    pub async fn create(
        pool: &PgPool,
        requested_by: Uuid,
        input: &CreateReimbursement,
    ) -> Result<Reimbursement, sqlx::Error> {
        let query = format!(
            "INSERT INTO reimbursements (requested_by, project_id, amount_cents, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reimbursement>(&query)
            .bind(requested_by)
            .bind(input.project_id)
            .bind(input.amount_cents)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a reimbursement by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<Reimbursement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reimbursements WHERE id = $1");
        sqlx::query_as::<_, Reimbursement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every reimbursement, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Reimbursement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reimbursements ORDER BY created_at DESC");
        sqlx::query_as::<_, Reimbursement>(&query)
            .fetch_all(pool)
            .await
    }

    /// List a single user's reimbursements, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<Reimbursement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reimbursements WHERE requested_by = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Reimbursement>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
