use clubdesk_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A row from the `projects` table.
///
/// `status` is the raw wire string; parse with
/// [`ProjectStatus::parse`](clubdesk_core::status::ProjectStatus) where the
/// enum is needed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub lead_id: Uuid,
    pub status: String,
    pub approved_at: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub return_initiated_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `project_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: Timestamp,
}

/// DTO for `POST /api/v1/projects`. The requester becomes the lead.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 3, max = 120))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
}
