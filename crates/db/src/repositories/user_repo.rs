//! Repository for the `users` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, email, name, role, can_approve_projects, \
    can_approve_item_requests, can_manage_inventory, can_approve_reimbursements, \
    created_at, updated_at";

/// Provides access to the user directory.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users \
                 (email, name, role, can_approve_projects, can_approve_item_requests, \
                  can_manage_inventory, can_approve_reimbursements) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(input.role.as_deref().unwrap_or("member"))
            .bind(input.can_approve_projects)
            .bind(input.can_approve_item_requests)
            .bind(input.can_manage_inventory)
            .bind(input.can_approve_reimbursements)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id. Used on every authenticated request to build the
    /// actor with a fresh capability set.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all users, ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY name ASC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }
}
