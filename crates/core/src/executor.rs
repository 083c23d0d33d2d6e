//! Transition executor.
//!
//! [`TransitionExecutor`] applies a validated transition through a
//! [`LifecycleStore`]: it loads a fresh snapshot, runs the policy with the
//! explicit actor, and hands the store the transition together with the
//! loaded status as the conditional-update precondition. The store contract
//! is all-or-nothing: the status write, derived timestamps, and every side
//! effect commit in a single atomic batch, and a precondition mismatch fails
//! with [`CoreError::StaleState`] leaving nothing applied.

use async_trait::async_trait;

use crate::actor::Actor;
use crate::error::CoreError;
use crate::policy::{
    self, BucketAction, BucketSnapshot, ItemRequestAction, ItemRequestSnapshot, ProjectAction,
    ProjectSnapshot, ReimbursementAction, ReimbursementSnapshot,
};
use crate::status::{BucketStatus, ItemRequestStatus, ProjectStatus, ReimbursementStatus};
use crate::types::EntityId;

/* --------------------------------------------------------------------------
Transitions and their side effects
-------------------------------------------------------------------------- */

/// Side effect a project transition carries into the store's atomic batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectEffect {
    /// All pending inventory requests become fulfilled and stock is
    /// decremented; insufficient stock fails the whole batch.
    FulfillPendingRequests,
    /// All pending inventory requests become rejected.
    RejectPendingRequests,
    /// Fulfilled non-perishable requests enter the return workflow.
    BeginReturnOfNonPerishables,
}

/// A decided project transition, ready for the store.
#[derive(Debug, Clone)]
pub struct ProjectTransition {
    pub to: ProjectStatus,
    pub effect: Option<ProjectEffect>,
}

impl ProjectAction {
    /// The side effect this action carries, if any.
    pub fn effect(self) -> Option<ProjectEffect> {
        match self {
            Self::Approve => Some(ProjectEffect::FulfillPendingRequests),
            Self::Reject => Some(ProjectEffect::RejectPendingRequests),
            Self::InitiateCompletion => Some(ProjectEffect::BeginReturnOfNonPerishables),
            Self::Start | Self::ConfirmReturn | Self::Close => None,
        }
    }
}

/// Lockstep advancement of a bucket's item requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCascade {
    /// approved -> ordered, when the bucket is marked ordered.
    ApprovedToOrdered,
    /// ordered -> received, when the bucket is marked received.
    OrderedToReceived,
}

/// A decided bucket transition, ready for the store.
#[derive(Debug, Clone)]
pub struct BucketTransition {
    pub to: BucketStatus,
    pub cascade: Option<ItemCascade>,
}

impl BucketAction {
    /// The lockstep cascade this action carries, if any.
    pub fn cascade(self) -> Option<ItemCascade> {
        match self {
            Self::Close => None,
            Self::MarkOrdered => Some(ItemCascade::ApprovedToOrdered),
            Self::MarkReceived => Some(ItemCascade::OrderedToReceived),
        }
    }
}

/// A decided item request approval/rejection, ready for the store.
#[derive(Debug, Clone)]
pub struct ItemRequestDecision {
    pub to: ItemRequestStatus,
    pub rejection_reason: Option<String>,
}

/* --------------------------------------------------------------------------
Store seam
-------------------------------------------------------------------------- */

/// Persistence collaborator for lifecycle transitions.
///
/// `load_*` reads a fresh snapshot. `apply_*` performs a conditional update:
/// it must verify the entity's current status equals `expected` and apply the
/// new status, derived timestamps, and all side effects in one atomic batch.
/// On a status mismatch it fails with [`CoreError::StaleState`] and applies
/// nothing; a failed side effect fails with [`CoreError::Dependency`] and
/// rolls everything back.
#[async_trait]
pub trait LifecycleStore: Send + Sync {
    async fn load_project(&self, id: EntityId) -> Result<ProjectSnapshot, CoreError>;

    async fn apply_project(
        &self,
        id: EntityId,
        expected: ProjectStatus,
        transition: &ProjectTransition,
    ) -> Result<(), CoreError>;

    async fn load_bucket(&self, id: EntityId) -> Result<BucketSnapshot, CoreError>;

    async fn apply_bucket(
        &self,
        id: EntityId,
        expected: BucketStatus,
        transition: &BucketTransition,
    ) -> Result<(), CoreError>;

    async fn load_item_request(&self, id: EntityId) -> Result<ItemRequestSnapshot, CoreError>;

    /// Must additionally verify the parent bucket is still `closed`.
    async fn apply_item_request(
        &self,
        id: EntityId,
        expected: ItemRequestStatus,
        decision: &ItemRequestDecision,
    ) -> Result<(), CoreError>;

    async fn load_reimbursement(&self, id: EntityId)
        -> Result<ReimbursementSnapshot, CoreError>;

    async fn apply_reimbursement(
        &self,
        id: EntityId,
        expected: ReimbursementStatus,
        to: ReimbursementStatus,
    ) -> Result<(), CoreError>;
}

/* --------------------------------------------------------------------------
Executor
-------------------------------------------------------------------------- */

/// Applies legal transitions through a [`LifecycleStore`].
///
/// Concurrent attempts on the same entity are resolved by the store's
/// conditional update: the loser observes [`CoreError::StaleState`] and must
/// re-read before retrying. Nothing is retried automatically.
pub struct TransitionExecutor<S> {
    store: S,
}

impl<S: LifecycleStore> TransitionExecutor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply a project lifecycle action. Returns the new status.
    pub async fn project(
        &self,
        id: EntityId,
        action: ProjectAction,
        actor: &Actor,
    ) -> Result<ProjectStatus, CoreError> {
        let snapshot = self.store.load_project(id).await?;
        let to = policy::project_transition(action, &snapshot, actor)?;
        let transition = ProjectTransition {
            to,
            effect: action.effect(),
        };
        self.store
            .apply_project(id, snapshot.status, &transition)
            .await?;
        Ok(to)
    }

    /// Apply a bucket lifecycle action. Returns the new status.
    pub async fn bucket(
        &self,
        id: EntityId,
        action: BucketAction,
        actor: &Actor,
    ) -> Result<BucketStatus, CoreError> {
        let snapshot = self.store.load_bucket(id).await?;
        let to = policy::bucket_transition(action, &snapshot, actor)?;
        let transition = BucketTransition {
            to,
            cascade: action.cascade(),
        };
        self.store
            .apply_bucket(id, snapshot.status, &transition)
            .await?;
        Ok(to)
    }

    /// Approve or reject an item request. Returns the new status.
    pub async fn item_request(
        &self,
        id: EntityId,
        action: ItemRequestAction,
        rejection_reason: Option<String>,
        actor: &Actor,
    ) -> Result<ItemRequestStatus, CoreError> {
        let snapshot = self.store.load_item_request(id).await?;
        let to = policy::item_request_decision(action, &snapshot, actor)?;
        let decision = ItemRequestDecision {
            to,
            rejection_reason: rejection_reason.filter(|_| action == ItemRequestAction::Reject),
        };
        self.store
            .apply_item_request(id, snapshot.status, &decision)
            .await?;
        Ok(to)
    }

    /// Apply a reimbursement lifecycle action. Returns the new status.
    pub async fn reimbursement(
        &self,
        id: EntityId,
        action: ReimbursementAction,
        actor: &Actor,
    ) -> Result<ReimbursementStatus, CoreError> {
        let snapshot = self.store.load_reimbursement(id).await?;
        let to = policy::reimbursement_transition(action, &snapshot, actor)?;
        self.store
            .apply_reimbursement(id, snapshot.status, to)
            .await?;
        Ok(to)
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
