//! Integration tests for the transition and action-gate endpoints: the HTTP
//! status mapping for policy outcomes, and the gate/transition agreement.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, expect_json, get_authed, post_authed, seed_user, token_for, Grants,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn project_approval_flow_maps_policy_to_http(pool: PgPool) {
    let lead = seed_user(&pool, "lead", None, Grants::default()).await;
    let approver = seed_user(
        &pool,
        "approver",
        None,
        Grants {
            approve_projects: true,
            ..Grants::default()
        },
    )
    .await;
    let lead_token = token_for(&lead);
    let approver_token = token_for(&approver);

    // Lead submits a project.
    let created = expect_json(
        post_authed(
            common::build_test_app(pool.clone()),
            "/api/v1/projects",
            &lead_token,
            json!({"title": "Solar car", "description": "Build a solar-powered go-kart"}),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["status"], "pending_approval");
    let id = created["id"].as_str().unwrap().to_string();

    // The gate offers approve/reject to the approver, nothing to the lead.
    let offered = expect_json(
        get_authed(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/projects/{id}/actions"),
            &approver_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(offered, json!(["approve", "reject"]));

    let offered = expect_json(
        get_authed(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/projects/{id}/actions"),
            &lead_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(offered, json!([]));

    // Lead attempting approval: policy says no -> 403.
    let forbidden = post_authed(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}/transition"),
        &lead_token,
        json!({"action": "approve"}),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(forbidden).await["code"], "FORBIDDEN");

    // Approver approves.
    let approved = expect_json(
        post_authed(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/projects/{id}/transition"),
            &approver_token,
            json!({"action": "approve"}),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(approved["status"], "approved");

    // Approving again conflicts with the current status -> 409.
    let conflict = post_authed(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}/transition"),
        &approver_token,
        json!({"action": "approve"}),
    )
    .await;
    assert_eq!(conflict.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(conflict).await["code"], "INVALID_TRANSITION");

    // The lead may now start the project.
    let started = expect_json(
        post_authed(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/projects/{id}/transition"),
            &lead_token,
            json!({"action": "start"}),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(started["status"], "active");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_create_payloads_return_400(pool: PgPool) {
    let member = seed_user(&pool, "member", None, Grants::default()).await;
    let token = token_for(&member);

    let response = post_authed(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        &token,
        json!({"title": "x", "description": "too short a title"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_authed(
        common::build_test_app(pool),
        "/api/v1/reimbursements",
        &token,
        json!({"amount_cents": 0, "description": "zero is not a cost"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn item_decisions_are_rejected_while_the_bucket_is_open(pool: PgPool) {
    let creator = seed_user(&pool, "creator", None, Grants::default()).await;
    let decider = seed_user(
        &pool,
        "decider",
        None,
        Grants {
            approve_item_requests: true,
            ..Grants::default()
        },
    )
    .await;
    let creator_token = token_for(&creator);

    let bucket = expect_json(
        post_authed(
            common::build_test_app(pool.clone()),
            "/api/v1/buckets",
            &creator_token,
            json!({"description": "Spring order"}),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let bucket_id = bucket["id"].as_str().unwrap().to_string();

    let item = expect_json(
        post_authed(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/buckets/{bucket_id}/items"),
            &creator_token,
            json!({
                "item_name": "Stepper motors",
                "justification": "CNC axis drive",
                "quantity": 3,
                "estimated_cost_cents": 4500
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let item_id = item["id"].as_str().unwrap().to_string();

    // Even the capability holder cannot decide in an open bucket.
    let early = post_authed(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{item_id}/decision"),
        &token_for(&decider),
        json!({"action": "approve"}),
    )
    .await;
    assert_eq!(early.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(early).await["code"], "INVALID_TRANSITION");

    // Close the bucket, then the same decision succeeds.
    let closed = post_authed(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/buckets/{bucket_id}/transition"),
        &creator_token,
        json!({"action": "close"}),
    )
    .await;
    assert_eq!(closed.status(), StatusCode::OK);

    let decided = expect_json(
        post_authed(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/items/{item_id}/decision"),
            &token_for(&decider),
            json!({"action": "approve"}),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(decided["status"], "approved");

    // Totals now count the approved request.
    let detail = expect_json(
        get_authed(
            common::build_test_app(pool),
            &format!("/api/v1/buckets/{bucket_id}"),
            &creator_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(detail["totals"]["estimated_total_cents"], 13500);
    assert_eq!(detail["totals"]["approved_total_cents"], 13500);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn user_creation_is_admin_only(pool: PgPool) {
    let member = seed_user(&pool, "member", None, Grants::default()).await;
    let admin = seed_user(&pool, "admin", Some("admin"), Grants::default()).await;

    let payload = json!({"email": "new@club.test", "name": "New Member"});

    let denied = post_authed(
        common::build_test_app(pool.clone()),
        "/api/v1/users",
        &token_for(&member),
        payload.clone(),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let created = post_authed(
        common::build_test_app(pool),
        "/api/v1/users",
        &token_for(&admin),
        payload,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
}
