//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use clubdesk_db::models::user::{CreateUser, User};
use clubdesk_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// POST /api/v1/users (admin only)
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    input.validate()?;
    let user = UserRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users
pub async fn list(_user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users))
}
