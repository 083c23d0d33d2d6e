//! Handlers for the `/buckets` resource: procurement buckets, their item
//! requests, the action gate, and lifecycle transitions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use clubdesk_core::error::CoreError;
use clubdesk_core::executor::{LifecycleStore, TransitionExecutor};
use clubdesk_core::gate;
use clubdesk_core::policy::BucketAction;
use clubdesk_core::status::BucketStatus;
use clubdesk_db::models::procurement::{
    Bucket, BucketTotals, CreateBucket, CreateItemRequest, ItemRequest,
};
use clubdesk_db::repositories::{BucketRepo, ItemRequestRepo};
use clubdesk_events::DomainEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::projects::TransitionResponse;
use crate::middleware::auth::{AuthUser, CurrentActor};
use crate::state::AppState;

/// Body of `POST /buckets/{id}/transition`.
#[derive(Debug, Deserialize)]
pub struct BucketTransitionRequest {
    pub action: BucketAction,
}

/// A bucket together with its cost summary.
#[derive(Debug, Serialize)]
pub struct BucketDetail {
    #[serde(flatten)]
    pub bucket: Bucket,
    pub totals: BucketTotals,
}

/// POST /api/v1/buckets
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBucket>,
) -> AppResult<(StatusCode, Json<Bucket>)> {
    input.validate()?;
    let bucket = BucketRepo::create(&state.pool, user.user_id, &input).await?;

    state.event_bus.publish(
        DomainEvent::new("bucket.opened")
            .with_entity("bucket", bucket.id)
            .with_actor(user.user_id),
    );
    Ok((StatusCode::CREATED, Json(bucket)))
}

/// GET /api/v1/buckets
pub async fn list(_user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Bucket>>> {
    let buckets = BucketRepo::list(&state.pool).await?;
    Ok(Json(buckets))
}

/// GET /api/v1/buckets/{id} -- the bucket with its cost totals.
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BucketDetail>> {
    let bucket = BucketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: BucketStatus::ENTITY,
            id,
        }))?;
    let totals = BucketRepo::totals(&state.pool, id).await?;
    Ok(Json(BucketDetail { bucket, totals }))
}

/// GET /api/v1/buckets/{id}/actions
pub async fn actions(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<BucketAction>>> {
    let snapshot = state.store().load_bucket(id).await?;
    Ok(Json(gate::bucket_actions(&snapshot, &actor)))
}

/// POST /api/v1/buckets/{id}/transition
pub async fn transition(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<BucketTransitionRequest>,
) -> AppResult<Json<TransitionResponse>> {
    let executor = TransitionExecutor::new(state.store());
    let status = executor.bucket(id, input.action, &actor).await?;

    state.event_bus.publish(
        DomainEvent::new(format!("bucket.{status}"))
            .with_entity("bucket", id)
            .with_actor(actor.uid),
    );
    Ok(Json(TransitionResponse {
        id,
        status: status.to_string(),
    }))
}

/// GET /api/v1/buckets/{id}/items
pub async fn list_items(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ItemRequest>>> {
    let items = ItemRequestRepo::list_for_bucket(&state.pool, id).await?;
    Ok(Json(items))
}

/// POST /api/v1/buckets/{id}/items -- only while the bucket is open.
pub async fn create_item(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemRequest>)> {
    input.validate()?;
    let request = ItemRequestRepo::create(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Item requests can only be added while the bucket is open".into(),
            ))
        })?;

    state.event_bus.publish(
        DomainEvent::new("item_request.filed")
            .with_entity("item_request", request.id)
            .with_actor(user.user_id),
    );
    Ok((StatusCode::CREATED, Json(request)))
}
