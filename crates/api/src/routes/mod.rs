pub mod buckets;
pub mod health;
pub mod inventory;
pub mod items;
pub mod projects;
pub mod reimbursements;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                                    list, create (admin only)
///
/// /projects                                 list, create
/// /projects/{id}                            get
/// /projects/{id}/actions                    available transitions for the actor
/// /projects/{id}/transition                 apply a lifecycle action (POST)
/// /projects/{id}/join                       join the team (POST)
/// /projects/{id}/leave                      leave the team (POST)
/// /projects/{id}/inventory-requests         list, create
///
/// /inventory                                list, create stock items
/// /inventory/returns                        pending returns (GET), confirm (POST)
///
/// /buckets                                  list, create
/// /buckets/{id}                             get with cost totals
/// /buckets/{id}/actions                     available transitions for the actor
/// /buckets/{id}/transition                  apply a lifecycle action (POST)
/// /buckets/{id}/items                       list, create item requests
///
/// /items/{id}/actions                       available decisions for the actor
/// /items/{id}/decision                      approve/reject an item request (POST)
///
/// /reimbursements                           list, create
/// /reimbursements/{id}/actions              available transitions for the actor
/// /reimbursements/{id}/transition           apply a lifecycle action (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/projects", projects::router())
        .nest("/inventory", inventory::router())
        .nest("/buckets", buckets::router())
        .nest("/items", items::router())
        .nest("/reimbursements", reimbursements::router())
}
