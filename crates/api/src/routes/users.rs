//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /    -> list
/// POST   /    -> create (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(users::list).post(users::create))
}
