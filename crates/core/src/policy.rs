//! Status transition policy.
//!
//! The transition tables live here as pure functions, independent of any
//! rendering or storage layer. For each action the policy checks, in order:
//! that the edge exists from the entity's current status, that the actor is
//! authorized to take it, and any extra precondition the edge carries.
//!
//! Authorization is always evaluated against the explicit [`Actor`] argument.

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, Capability};
use crate::error::CoreError;
use crate::status::{BucketStatus, ItemRequestStatus, ProjectStatus, ReimbursementStatus};
use crate::types::EntityId;

/* --------------------------------------------------------------------------
Snapshots
-------------------------------------------------------------------------- */

/// The slice of a project the policy needs to decide a transition.
#[derive(Debug, Clone)]
pub struct ProjectSnapshot {
    pub id: EntityId,
    pub lead_id: EntityId,
    pub status: ProjectStatus,
    /// Non-perishable inventory requests still awaiting confirmed return.
    pub outstanding_returns: u32,
}

/// The slice of a procurement bucket the policy needs.
#[derive(Debug, Clone)]
pub struct BucketSnapshot {
    pub id: EntityId,
    pub created_by: EntityId,
    pub status: BucketStatus,
}

/// The slice of an item request (plus its parent bucket) the policy needs.
#[derive(Debug, Clone)]
pub struct ItemRequestSnapshot {
    pub id: EntityId,
    pub bucket_id: EntityId,
    pub status: ItemRequestStatus,
    pub bucket_status: BucketStatus,
}

/// The slice of a reimbursement the policy needs.
#[derive(Debug, Clone)]
pub struct ReimbursementSnapshot {
    pub id: EntityId,
    pub requested_by: EntityId,
    pub status: ReimbursementStatus,
}

/* --------------------------------------------------------------------------
Actions
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectAction {
    Approve,
    Reject,
    Start,
    InitiateCompletion,
    ConfirmReturn,
    Close,
}

impl ProjectAction {
    pub const ALL: [Self; 6] = [
        Self::Approve,
        Self::Reject,
        Self::Start,
        Self::InitiateCompletion,
        Self::ConfirmReturn,
        Self::Close,
    ];

    /// The (from, to) edge this action travels.
    pub fn edge(self) -> (ProjectStatus, ProjectStatus) {
        match self {
            Self::Approve => (ProjectStatus::PendingApproval, ProjectStatus::Approved),
            Self::Reject => (ProjectStatus::PendingApproval, ProjectStatus::Rejected),
            Self::Start => (ProjectStatus::Approved, ProjectStatus::Active),
            Self::InitiateCompletion => (ProjectStatus::Active, ProjectStatus::PendingReturn),
            Self::ConfirmReturn => (ProjectStatus::PendingReturn, ProjectStatus::Completed),
            Self::Close => (ProjectStatus::Completed, ProjectStatus::Closed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketAction {
    Close,
    MarkOrdered,
    MarkReceived,
}

impl BucketAction {
    pub const ALL: [Self; 3] = [Self::Close, Self::MarkOrdered, Self::MarkReceived];

    /// The (from, to) edge this action travels.
    pub fn edge(self) -> (BucketStatus, BucketStatus) {
        match self {
            Self::Close => (BucketStatus::Open, BucketStatus::Closed),
            Self::MarkOrdered => (BucketStatus::Closed, BucketStatus::Ordered),
            Self::MarkReceived => (BucketStatus::Ordered, BucketStatus::Received),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRequestAction {
    Approve,
    Reject,
}

impl ItemRequestAction {
    pub const ALL: [Self; 2] = [Self::Approve, Self::Reject];

    pub fn target(self) -> ItemRequestStatus {
        match self {
            Self::Approve => ItemRequestStatus::Approved,
            Self::Reject => ItemRequestStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReimbursementAction {
    Approve,
    Reject,
    MarkPaid,
}

impl ReimbursementAction {
    pub const ALL: [Self; 3] = [Self::Approve, Self::Reject, Self::MarkPaid];

    /// The (from, to) edge this action travels.
    pub fn edge(self) -> (ReimbursementStatus, ReimbursementStatus) {
        match self {
            Self::Approve => (ReimbursementStatus::Pending, ReimbursementStatus::Approved),
            Self::Reject => (ReimbursementStatus::Pending, ReimbursementStatus::Rejected),
            Self::MarkPaid => (ReimbursementStatus::Approved, ReimbursementStatus::Paid),
        }
    }
}

/* --------------------------------------------------------------------------
Policy
-------------------------------------------------------------------------- */

/// Decide a project transition. Returns the new status on success.
pub fn project_transition(
    action: ProjectAction,
    project: &ProjectSnapshot,
    actor: &Actor,
) -> Result<ProjectStatus, CoreError> {
    let (from, to) = action.edge();
    if project.status != from {
        return Err(CoreError::InvalidTransition {
            entity: ProjectStatus::ENTITY,
            from: project.status.as_str(),
            to: to.as_str(),
        });
    }

    match action {
        ProjectAction::Approve | ProjectAction::Reject => {
            if !actor.has(Capability::ApproveProjects) {
                return Err(CoreError::Unauthorized(
                    "Approving or rejecting projects requires the approve-projects capability"
                        .into(),
                ));
            }
        }
        ProjectAction::Start | ProjectAction::InitiateCompletion => {
            if actor.uid != project.lead_id {
                return Err(CoreError::Unauthorized(
                    "Only the project lead may do this".into(),
                ));
            }
        }
        ProjectAction::ConfirmReturn => {
            if !actor.has(Capability::ManageInventory) {
                return Err(CoreError::Unauthorized(
                    "Confirming returns requires the manage-inventory capability".into(),
                ));
            }
            if project.outstanding_returns > 0 {
                return Err(CoreError::Validation(format!(
                    "{} non-perishable item(s) have not been returned yet",
                    project.outstanding_returns
                )));
            }
        }
        ProjectAction::Close => {
            if !actor.role.can_manage() {
                return Err(CoreError::Unauthorized(
                    "Closing a project requires the admin or coordinator role".into(),
                ));
            }
        }
    }

    Ok(to)
}

/// Decide a bucket transition. The whole bucket lifecycle is driven by its
/// creator.
pub fn bucket_transition(
    action: BucketAction,
    bucket: &BucketSnapshot,
    actor: &Actor,
) -> Result<BucketStatus, CoreError> {
    let (from, to) = action.edge();
    if bucket.status != from {
        return Err(CoreError::InvalidTransition {
            entity: BucketStatus::ENTITY,
            from: bucket.status.as_str(),
            to: to.as_str(),
        });
    }

    if actor.uid != bucket.created_by {
        return Err(CoreError::Unauthorized(
            "Only the bucket creator may advance its lifecycle".into(),
        ));
    }

    Ok(to)
}

/// Decide an item request approval/rejection.
///
/// Permitted only while the parent bucket is `closed` and the request is
/// still `pending`; approval after the bucket has moved on to ordered or
/// received is not allowed. The bucket-status check comes first so the
/// failure is `InvalidTransition` regardless of actor permissions.
pub fn item_request_decision(
    action: ItemRequestAction,
    request: &ItemRequestSnapshot,
    actor: &Actor,
) -> Result<ItemRequestStatus, CoreError> {
    let to = action.target();
    if request.bucket_status != BucketStatus::Closed || request.status != ItemRequestStatus::Pending
    {
        return Err(CoreError::InvalidTransition {
            entity: ItemRequestStatus::ENTITY,
            from: request.status.as_str(),
            to: to.as_str(),
        });
    }

    if !actor.has(Capability::ApproveItemRequests) {
        return Err(CoreError::Unauthorized(
            "Deciding item requests requires the approve-item-requests capability".into(),
        ));
    }

    Ok(to)
}

/// Decide a reimbursement transition.
pub fn reimbursement_transition(
    action: ReimbursementAction,
    reimbursement: &ReimbursementSnapshot,
    actor: &Actor,
) -> Result<ReimbursementStatus, CoreError> {
    let (from, to) = action.edge();
    if reimbursement.status != from {
        return Err(CoreError::InvalidTransition {
            entity: ReimbursementStatus::ENTITY,
            from: reimbursement.status.as_str(),
            to: to.as_str(),
        });
    }

    match action {
        ReimbursementAction::Approve | ReimbursementAction::Reject => {
            if !actor.has(Capability::ApproveReimbursements) {
                return Err(CoreError::Unauthorized(
                    "Deciding reimbursements requires the approve-reimbursements capability"
                        .into(),
                ));
            }
        }
        ReimbursementAction::MarkPaid => {
            if !actor.role.can_manage() {
                return Err(CoreError::Unauthorized(
                    "Marking a reimbursement paid requires the admin or coordinator role".into(),
                ));
            }
        }
    }

    Ok(to)
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
