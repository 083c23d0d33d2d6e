//! Repository for the `projects` and `project_members` tables.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::project::{CreateProject, Project};

/// Column list for `projects` queries.
const COLUMNS: &str = "id, title, description, lead_id, status, \
    approved_at, started_at, return_initiated_at, completed_at, closed_at, \
    created_at, updated_at";

/// Provides CRUD and membership operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Create a project in `pending_approval` with the lead as its first
    /// member. Both inserts run in one transaction so `lead_id` is always a
    /// member.
    pub async fn create(
        pool: &PgPool,
        lead_id: Uuid,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (title, description, lead_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(lead_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO project_members (project_id, user_id) VALUES ($1, $2)")
            .bind(project.id)
            .bind(lead_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Member ids of a project.
    pub async fn member_ids(pool: &PgPool, project_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM project_members WHERE project_id = $1")
                .bind(project_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Whether a user is a member of the project.
    pub async fn is_member(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM project_members WHERE project_id = $1 AND user_id = $2)",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Add a user to the project team. Idempotent.
    pub async fn join(pool: &PgPool, project_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO project_members (project_id, user_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a user from the project team. The lead's row is never removed
    /// (lead_id must stay a member); returns `false` when nothing was
    /// deleted.
    pub async fn leave(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM project_members \
             WHERE project_id = $1 AND user_id = $2 \
               AND user_id <> (SELECT lead_id FROM projects WHERE id = $1)",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
