//! Integration tests for the Postgres lifecycle store: transitions, their
//! side effects, and the conditional-update guarantees, exercised through
//! the executor against a real database.

use assert_matches::assert_matches;
use sqlx::PgPool;
use uuid::Uuid;

use clubdesk_core::actor::{Actor, Capability, Role};
use clubdesk_core::error::CoreError;
use clubdesk_core::executor::{ProjectTransition, TransitionExecutor};
use clubdesk_core::policy::{BucketAction, ItemRequestAction, ProjectAction, ReimbursementAction};
use clubdesk_core::status::{BucketStatus, ItemRequestStatus, ProjectStatus, ReimbursementStatus};
use clubdesk_core::LifecycleStore;

use clubdesk_db::models::inventory::{
    CreateInventoryItem, CreateInventoryRequest, InventoryItem, InventoryRequest,
};
use clubdesk_db::models::procurement::{CreateBucket, CreateItemRequest};
use clubdesk_db::models::project::{CreateProject, Project};
use clubdesk_db::models::reimbursement::CreateReimbursement;
use clubdesk_db::models::user::{CreateUser, User};
use clubdesk_db::repositories::{
    BucketRepo, InventoryRepo, ItemRequestRepo, ProjectRepo, ReimbursementRepo, UserRepo,
};
use clubdesk_db::PgLifecycleStore;

async fn create_user(pool: &PgPool, name: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{name}@club.test"),
            name: name.to_string(),
            role: None,
            can_approve_projects: false,
            can_approve_item_requests: false,
            can_manage_inventory: false,
            can_approve_reimbursements: false,
        },
    )
    .await
    .unwrap()
}

async fn create_project(pool: &PgPool, lead: &User) -> Project {
    ProjectRepo::create(
        pool,
        lead.id,
        &CreateProject {
            title: "Autumn robotics build".into(),
            description: "Chassis and electronics for the fall competition".into(),
        },
    )
    .await
    .unwrap()
}

async fn create_item(pool: &PgPool, name: &str, quantity: i32, perishable: bool) -> InventoryItem {
    InventoryRepo::create_item(
        pool,
        &CreateInventoryItem {
            name: name.into(),
            available_quantity: quantity,
            is_perishable: perishable,
        },
    )
    .await
    .unwrap()
}

async fn request_item(
    pool: &PgPool,
    project: &Project,
    user: &User,
    item: &InventoryItem,
    quantity: i32,
) -> InventoryRequest {
    InventoryRepo::create_request(
        pool,
        project.id,
        user.id,
        &CreateInventoryRequest {
            item_id: item.id,
            quantity,
        },
    )
    .await
    .unwrap()
    .expect("guard should accept a member request against an open project")
}

fn project_approver() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Member).with_capability(Capability::ApproveProjects)
}

#[sqlx::test(migrations = "./migrations")]
async fn approve_fulfills_pending_requests_and_decrements_stock(pool: PgPool) {
    let lead = create_user(&pool, "lead").await;
    let project = create_project(&pool, &lead).await;
    let item = create_item(&pool, "soldering iron", 5, false).await;
    request_item(&pool, &project, &lead, &item, 3).await;

    let executor = TransitionExecutor::new(PgLifecycleStore::new(pool.clone()));
    let status = executor
        .project(project.id, ProjectAction::Approve, &project_approver())
        .await
        .unwrap();
    assert_eq!(status, ProjectStatus::Approved);

    let item = InventoryRepo::find_item(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(item.available_quantity, 2);

    let requests = InventoryRepo::list_requests_for_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].status, "fulfilled");
}

#[sqlx::test(migrations = "./migrations")]
async fn approve_with_insufficient_stock_rolls_everything_back(pool: PgPool) {
    let lead = create_user(&pool, "lead").await;
    let project = create_project(&pool, &lead).await;
    let item = create_item(&pool, "battery pack", 2, false).await;
    request_item(&pool, &project, &lead, &item, 3).await;

    let executor = TransitionExecutor::new(PgLifecycleStore::new(pool.clone()));
    let result = executor
        .project(project.id, ProjectAction::Approve, &project_approver())
        .await;
    assert_matches!(result, Err(CoreError::Dependency(_)));

    // Status write and stock are both untouched.
    let project = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(project.status, "pending_approval");
    let item = InventoryRepo::find_item(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(item.available_quantity, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn reject_discards_pending_requests_without_touching_stock(pool: PgPool) {
    let lead = create_user(&pool, "lead").await;
    let project = create_project(&pool, &lead).await;
    let item = create_item(&pool, "hot glue", 4, false).await;
    request_item(&pool, &project, &lead, &item, 4).await;

    let executor = TransitionExecutor::new(PgLifecycleStore::new(pool.clone()));
    executor
        .project(project.id, ProjectAction::Reject, &project_approver())
        .await
        .unwrap();

    let requests = InventoryRepo::list_requests_for_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(requests[0].status, "rejected");
    let item = InventoryRepo::find_item(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(item.available_quantity, 4);
}

#[sqlx::test(migrations = "./migrations")]
async fn completion_requires_every_non_perishable_back_in_stock(pool: PgPool) {
    let lead = create_user(&pool, "lead").await;
    let lead_actor = Actor::new(lead.id, Role::Member);
    let project = create_project(&pool, &lead).await;
    let tools = create_item(&pool, "hex key set", 10, false).await;
    let snacks = create_item(&pool, "snacks", 10, true).await;
    let tool_request = request_item(&pool, &project, &lead, &tools, 2).await;
    request_item(&pool, &project, &lead, &snacks, 5).await;

    let executor = TransitionExecutor::new(PgLifecycleStore::new(pool.clone()));
    executor
        .project(project.id, ProjectAction::Approve, &project_approver())
        .await
        .unwrap();
    executor
        .project(project.id, ProjectAction::Start, &lead_actor)
        .await
        .unwrap();
    executor
        .project(project.id, ProjectAction::InitiateCompletion, &lead_actor)
        .await
        .unwrap();

    // Only the non-perishable request enters the return workflow.
    let pending = InventoryRepo::list_pending_returns(&pool).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, tool_request.id);

    let manager =
        Actor::new(Uuid::new_v4(), Role::Member).with_capability(Capability::ManageInventory);
    let blocked = executor
        .project(project.id, ProjectAction::ConfirmReturn, &manager)
        .await;
    assert_matches!(blocked, Err(CoreError::Validation(_)));

    let confirmed = InventoryRepo::confirm_returns(&pool, &[tool_request.id])
        .await
        .unwrap();
    assert!(confirmed);
    let tools = InventoryRepo::find_item(&pool, tools.id).await.unwrap().unwrap();
    assert_eq!(tools.available_quantity, 10);

    let status = executor
        .project(project.id, ProjectAction::ConfirmReturn, &manager)
        .await
        .unwrap();
    assert_eq!(status, ProjectStatus::Completed);
}

#[sqlx::test(migrations = "./migrations")]
async fn stale_project_write_is_rejected_with_nothing_applied(pool: PgPool) {
    let lead = create_user(&pool, "lead").await;
    let project = create_project(&pool, &lead).await;

    let store = PgLifecycleStore::new(pool.clone());
    let executor = TransitionExecutor::new(store);
    executor
        .project(project.id, ProjectAction::Approve, &project_approver())
        .await
        .unwrap();

    // A writer still holding the pre-approval snapshot loses.
    let stale = executor
        .store()
        .apply_project(
            project.id,
            ProjectStatus::PendingApproval,
            &ProjectTransition {
                to: ProjectStatus::Rejected,
                effect: None,
            },
        )
        .await;
    assert_matches!(stale, Err(CoreError::StaleState { .. }));

    let project = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(project.status, "approved");
}

#[sqlx::test(migrations = "./migrations")]
async fn bucket_transitions_cascade_to_their_item_requests(pool: PgPool) {
    let creator = create_user(&pool, "creator").await;
    let creator_actor = Actor::new(creator.id, Role::Member);
    let bucket = BucketRepo::create(
        &pool,
        creator.id,
        &CreateBucket {
            description: "October order".into(),
        },
    )
    .await
    .unwrap();

    let request = ItemRequestRepo::create(
        &pool,
        bucket.id,
        creator.id,
        &CreateItemRequest {
            item_name: "Aluminium extrusion".into(),
            justification: "frame stock".into(),
            quantity: 4,
            estimated_cost_cents: 1250,
        },
    )
    .await
    .unwrap()
    .unwrap();

    let executor = TransitionExecutor::new(PgLifecycleStore::new(pool.clone()));
    let approver =
        Actor::new(Uuid::new_v4(), Role::Member).with_capability(Capability::ApproveItemRequests);

    // Decisions are only possible in a closed bucket.
    let early = executor
        .item_request(request.id, ItemRequestAction::Approve, None, &approver)
        .await;
    assert_matches!(early, Err(CoreError::InvalidTransition { .. }));

    executor
        .bucket(bucket.id, BucketAction::Close, &creator_actor)
        .await
        .unwrap();
    let status = executor
        .item_request(request.id, ItemRequestAction::Approve, None, &approver)
        .await
        .unwrap();
    assert_eq!(status, ItemRequestStatus::Approved);

    executor
        .bucket(bucket.id, BucketAction::MarkOrdered, &creator_actor)
        .await
        .unwrap();
    let items = ItemRequestRepo::list_for_bucket(&pool, bucket.id).await.unwrap();
    assert_eq!(items[0].status, "ordered");

    executor
        .bucket(bucket.id, BucketAction::MarkReceived, &creator_actor)
        .await
        .unwrap();
    let items = ItemRequestRepo::list_for_bucket(&pool, bucket.id).await.unwrap();
    assert_eq!(items[0].status, "received");
    assert_eq!(
        BucketRepo::find_by_id(&pool, bucket.id).await.unwrap().unwrap().status,
        BucketStatus::Received.to_string()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn rejection_records_the_reason_and_skips_the_cascade(pool: PgPool) {
    let creator = create_user(&pool, "creator").await;
    let creator_actor = Actor::new(creator.id, Role::Member);
    let bucket = BucketRepo::create(
        &pool,
        creator.id,
        &CreateBucket {
            description: "November order".into(),
        },
    )
    .await
    .unwrap();
    let request = ItemRequestRepo::create(
        &pool,
        bucket.id,
        creator.id,
        &CreateItemRequest {
            item_name: "Gold-plated cables".into(),
            justification: "".into(),
            quantity: 1,
            estimated_cost_cents: 99900,
        },
    )
    .await
    .unwrap()
    .unwrap();

    let executor = TransitionExecutor::new(PgLifecycleStore::new(pool.clone()));
    executor
        .bucket(bucket.id, BucketAction::Close, &creator_actor)
        .await
        .unwrap();

    let approver =
        Actor::new(Uuid::new_v4(), Role::Member).with_capability(Capability::ApproveItemRequests);
    executor
        .item_request(
            request.id,
            ItemRequestAction::Reject,
            Some("over budget".into()),
            &approver,
        )
        .await
        .unwrap();

    executor
        .bucket(bucket.id, BucketAction::MarkOrdered, &creator_actor)
        .await
        .unwrap();

    let items = ItemRequestRepo::list_for_bucket(&pool, bucket.id).await.unwrap();
    assert_eq!(items[0].status, "rejected");
    assert_eq!(items[0].rejection_reason.as_deref(), Some("over budget"));
}

#[sqlx::test(migrations = "./migrations")]
async fn item_requests_cannot_be_added_after_the_bucket_closes(pool: PgPool) {
    let creator = create_user(&pool, "creator").await;
    let bucket = BucketRepo::create(
        &pool,
        creator.id,
        &CreateBucket {
            description: "Closed order".into(),
        },
    )
    .await
    .unwrap();

    let executor = TransitionExecutor::new(PgLifecycleStore::new(pool.clone()));
    executor
        .bucket(
            bucket.id,
            BucketAction::Close,
            &Actor::new(creator.id, Role::Member),
        )
        .await
        .unwrap();

    let late = ItemRequestRepo::create(
        &pool,
        bucket.id,
        creator.id,
        &CreateItemRequest {
            item_name: "Afterthought".into(),
            justification: "".into(),
            quantity: 1,
            estimated_cost_cents: 100,
        },
    )
    .await
    .unwrap();
    assert!(late.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn reimbursement_lifecycle_stamps_decision_and_payment(pool: PgPool) {
    let member = create_user(&pool, "member").await;
    let reimbursement = ReimbursementRepo::create(
        &pool,
        member.id,
        &CreateReimbursement {
            amount_cents: 4250,
            description: "Pizza for the build night".into(),
            project_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(reimbursement.status, "pending");

    let executor = TransitionExecutor::new(PgLifecycleStore::new(pool.clone()));
    let treasurer = Actor::new(Uuid::new_v4(), Role::Member)
        .with_capability(Capability::ApproveReimbursements);
    let admin = Actor::new(Uuid::new_v4(), Role::Admin);

    // Paying out requires a managing role, not the approval capability.
    let denied = executor
        .reimbursement(reimbursement.id, ReimbursementAction::MarkPaid, &treasurer)
        .await;
    assert_matches!(
        denied,
        Err(CoreError::InvalidTransition { .. } | CoreError::Unauthorized(_))
    );

    executor
        .reimbursement(reimbursement.id, ReimbursementAction::Approve, &treasurer)
        .await
        .unwrap();
    let status = executor
        .reimbursement(reimbursement.id, ReimbursementAction::MarkPaid, &admin)
        .await
        .unwrap();
    assert_eq!(status, ReimbursementStatus::Paid);

    let row = ReimbursementRepo::find_by_id(&pool, reimbursement.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "paid");
    assert!(row.decided_at.is_some());
    assert!(row.paid_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn inventory_requests_are_guarded_by_membership_and_project_status(pool: PgPool) {
    let lead = create_user(&pool, "lead").await;
    let outsider = create_user(&pool, "outsider").await;
    let project = create_project(&pool, &lead).await;
    let item = create_item(&pool, "multimeter", 3, false).await;

    let denied = InventoryRepo::create_request(
        &pool,
        project.id,
        outsider.id,
        &CreateInventoryRequest {
            item_id: item.id,
            quantity: 1,
        },
    )
    .await
    .unwrap();
    assert!(denied.is_none());

    ProjectRepo::join(&pool, project.id, outsider.id).await.unwrap();
    let allowed = InventoryRepo::create_request(
        &pool,
        project.id,
        outsider.id,
        &CreateInventoryRequest {
            item_id: item.id,
            quantity: 1,
        },
    )
    .await
    .unwrap();
    assert!(allowed.is_some());

    // The lead's membership row cannot be removed.
    assert!(!ProjectRepo::leave(&pool, project.id, lead.id).await.unwrap());
    assert!(ProjectRepo::leave(&pool, project.id, outsider.id).await.unwrap());
}
