//! Handler for deciding item requests.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use clubdesk_core::executor::{LifecycleStore, TransitionExecutor};
use clubdesk_core::gate;
use clubdesk_core::policy::ItemRequestAction;
use clubdesk_events::DomainEvent;

use crate::error::AppResult;
use crate::handlers::projects::TransitionResponse;
use crate::middleware::auth::CurrentActor;
use crate::state::AppState;

/// Body of `POST /items/{id}/decision`.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub action: ItemRequestAction,
    /// Shown to the requester on rejection; ignored on approval.
    pub reason: Option<String>,
}

/// GET /api/v1/items/{id}/actions
pub async fn actions(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ItemRequestAction>>> {
    let snapshot = state.store().load_item_request(id).await?;
    Ok(Json(gate::item_request_actions(&snapshot, &actor)))
}

/// POST /api/v1/items/{id}/decision -- approve or reject a pending item
/// request in a closed bucket.
pub async fn decide(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<Json<TransitionResponse>> {
    let executor = TransitionExecutor::new(state.store());
    let status = executor
        .item_request(id, input.action, input.reason, &actor)
        .await?;

    state.event_bus.publish(
        DomainEvent::new(format!("item_request.{status}"))
            .with_entity("item_request", id)
            .with_actor(actor.uid),
    );
    Ok(Json(TransitionResponse {
        id,
        status: status.to_string(),
    }))
}
