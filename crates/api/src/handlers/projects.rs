//! Handlers for the `/projects` resource: CRUD, membership, the action gate,
//! lifecycle transitions, and project-scoped inventory requests.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use clubdesk_core::error::CoreError;
use clubdesk_core::executor::{LifecycleStore, TransitionExecutor};
use clubdesk_core::gate;
use clubdesk_core::policy::ProjectAction;
use clubdesk_core::status::ProjectStatus;
use clubdesk_db::models::inventory::{CreateInventoryRequest, InventoryRequest};
use clubdesk_db::models::project::{CreateProject, Project};
use clubdesk_db::repositories::{InventoryRepo, ProjectRepo};
use clubdesk_events::DomainEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, CurrentActor};
use crate::state::AppState;

/// Body of `POST /projects/{id}/transition`.
#[derive(Debug, Deserialize)]
pub struct ProjectTransitionRequest {
    pub action: ProjectAction,
}

/// Result of a committed transition.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub id: Uuid,
    pub status: String,
}

/// POST /api/v1/projects -- the requester becomes the lead.
pub async fn create(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    input.validate()?;
    let project = ProjectRepo::create(&state.pool, actor.uid, &input).await?;

    state.event_bus.publish(
        DomainEvent::new("project.submitted")
            .with_entity("project", project.id)
            .with_actor(actor.uid),
    );
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(_user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: ProjectStatus::ENTITY,
            id,
        }))?;
    Ok(Json(project))
}

/// GET /api/v1/projects/{id}/actions -- the transitions this actor may take
/// right now. An empty list is a valid answer, never an error.
pub async fn actions(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ProjectAction>>> {
    let snapshot = state.store().load_project(id).await?;
    Ok(Json(gate::project_actions(&snapshot, &actor)))
}

/// POST /api/v1/projects/{id}/transition
pub async fn transition(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProjectTransitionRequest>,
) -> AppResult<Json<TransitionResponse>> {
    let executor = TransitionExecutor::new(state.store());
    let status = executor.project(id, input.action, &actor).await?;

    state.event_bus.publish(
        DomainEvent::new(format!("project.{status}"))
            .with_entity("project", id)
            .with_actor(actor.uid),
    );
    Ok(Json(TransitionResponse {
        id,
        status: status.to_string(),
    }))
}

/// POST /api/v1/projects/{id}/join
pub async fn join(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    // 404 for unknown projects rather than a dangling membership row.
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: ProjectStatus::ENTITY,
            id,
        }))?;
    ProjectRepo::join(&state.pool, id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/leave -- the lead cannot leave their own
/// project.
pub async fn leave(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let left = ProjectRepo::leave(&state.pool, id, user.user_id).await?;
    if !left {
        return Err(AppError::Core(CoreError::Validation(
            "Not a removable member of this project".into(),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/inventory-requests
pub async fn list_inventory_requests(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryRequest>>> {
    let requests = InventoryRepo::list_requests_for_project(&state.pool, id).await?;
    Ok(Json(requests))
}

/// POST /api/v1/projects/{id}/inventory-requests
///
/// Members may file requests while the project is pending approval or
/// active; the guard lives in the insert itself.
pub async fn create_inventory_request(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateInventoryRequest>,
) -> AppResult<(StatusCode, Json<InventoryRequest>)> {
    input.validate()?;
    let request = InventoryRepo::create_request(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Inventory requests are only accepted from project members while the project \
                 is pending approval or active"
                    .into(),
            ))
        })?;

    state.event_bus.publish(
        DomainEvent::new("inventory_request.filed")
            .with_entity("inventory_request", request.id)
            .with_actor(user.user_id),
    );
    Ok((StatusCode::CREATED, Json(request)))
}
