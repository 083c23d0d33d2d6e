//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                            -> list
/// POST   /                            -> create
/// GET    /{id}                        -> get_by_id
/// GET    /{id}/actions                -> actions
/// POST   /{id}/transition             -> transition
/// POST   /{id}/join                   -> join
/// POST   /{id}/leave                  -> leave
/// GET    /{id}/inventory-requests     -> list_inventory_requests
/// POST   /{id}/inventory-requests     -> create_inventory_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/{id}", get(projects::get_by_id))
        .route("/{id}/actions", get(projects::actions))
        .route("/{id}/transition", post(projects::transition))
        .route("/{id}/join", post(projects::join))
        .route("/{id}/leave", post(projects::leave))
        .route(
            "/{id}/inventory-requests",
            get(projects::list_inventory_requests).post(projects::create_inventory_request),
        )
}
