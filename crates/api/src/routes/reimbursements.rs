//! Route definitions for the `/reimbursements` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reimbursements;
use crate::state::AppState;

/// Routes mounted at `/reimbursements`.
///
/// ```text
/// GET    /                    -> list (own, or all for deciders/managers)
/// POST   /                    -> create
/// GET    /{id}/actions        -> actions
/// POST   /{id}/transition     -> transition
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reimbursements::list).post(reimbursements::create))
        .route("/{id}/actions", get(reimbursements::actions))
        .route("/{id}/transition", post(reimbursements::transition))
}
