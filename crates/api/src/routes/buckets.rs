//! Route definitions for the `/buckets` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::buckets;
use crate::state::AppState;

/// Routes mounted at `/buckets`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /{id}                -> get_by_id (with cost totals)
/// GET    /{id}/actions        -> actions
/// POST   /{id}/transition     -> transition
/// GET    /{id}/items          -> list_items
/// POST   /{id}/items          -> create_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(buckets::list).post(buckets::create))
        .route("/{id}", get(buckets::get_by_id))
        .route("/{id}/actions", get(buckets::actions))
        .route("/{id}/transition", post(buckets::transition))
        .route(
            "/{id}/items",
            get(buckets::list_items).post(buckets::create_item),
        )
}
