//! Handlers for the `/reimbursements` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use clubdesk_core::actor::Capability;
use clubdesk_core::executor::{LifecycleStore, TransitionExecutor};
use clubdesk_core::gate;
use clubdesk_core::policy::ReimbursementAction;
use clubdesk_db::models::reimbursement::{CreateReimbursement, Reimbursement};
use clubdesk_db::repositories::ReimbursementRepo;
use clubdesk_events::DomainEvent;

use crate::error::AppResult;
use crate::handlers::projects::TransitionResponse;
use crate::middleware::auth::CurrentActor;
use crate::state::AppState;

/// Body of `POST /reimbursements/{id}/transition`.
#[derive(Debug, Deserialize)]
pub struct ReimbursementTransitionRequest {
    pub action: ReimbursementAction,
}

/// POST /api/v1/reimbursements
pub async fn create(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(input): Json<CreateReimbursement>,
) -> AppResult<(StatusCode, Json<Reimbursement>)> {
    input.validate()?;
    let reimbursement = ReimbursementRepo::create(&state.pool, actor.uid, &input).await?;

    state.event_bus.publish(
        DomainEvent::new("reimbursement.filed")
            .with_entity("reimbursement", reimbursement.id)
            .with_actor(actor.uid),
    );
    Ok((StatusCode::CREATED, Json(reimbursement)))
}

/// GET /api/v1/reimbursements
///
/// Deciders and managing roles see every filing; everyone else sees only
/// their own.
pub async fn list(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Reimbursement>>> {
    let rows = if actor.role.can_manage() || actor.has(Capability::ApproveReimbursements) {
        ReimbursementRepo::list(&state.pool).await?
    } else {
        ReimbursementRepo::list_for_user(&state.pool, actor.uid).await?
    };
    Ok(Json(rows))
}

/// GET /api/v1/reimbursements/{id}/actions
pub async fn actions(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ReimbursementAction>>> {
    let snapshot = state.store().load_reimbursement(id).await?;
    Ok(Json(gate::reimbursement_actions(&snapshot, &actor)))
}

/// POST /api/v1/reimbursements/{id}/transition
pub async fn transition(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ReimbursementTransitionRequest>,
) -> AppResult<Json<TransitionResponse>> {
    let executor = TransitionExecutor::new(state.store());
    let status = executor.reimbursement(id, input.action, &actor).await?;

    state.event_bus.publish(
        DomainEvent::new(format!("reimbursement.{status}"))
            .with_entity("reimbursement", id)
            .with_actor(actor.uid),
    );
    Ok(Json(TransitionResponse {
        id,
        status: status.to_string(),
    }))
}
