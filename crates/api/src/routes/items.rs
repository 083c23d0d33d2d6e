//! Route definitions for the `/items` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::items;
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET    /{id}/actions     -> actions
/// POST   /{id}/decision    -> decide (approve/reject with optional reason)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/actions", get(items::actions))
        .route("/{id}/decision", post(items::decide))
}
