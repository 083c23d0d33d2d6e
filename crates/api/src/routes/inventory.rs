//! Route definitions for the `/inventory` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

/// Routes mounted at `/inventory`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create (manage-inventory capability)
/// GET    /returns     -> list_pending_returns
/// POST   /returns     -> confirm_returns
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inventory::list).post(inventory::create))
        .route(
            "/returns",
            get(inventory::list_pending_returns).post(inventory::confirm_returns),
        )
}
