//! Action gate: the set of actions currently offered to an actor.
//!
//! Each function filters the full action set through the policy, so the gate
//! is exactly the set of actions [`crate::policy`] would accept — it can
//! never drift from the transition tables. The gate only drives UI
//! affordances; the executor re-validates every invocation server-side.

use crate::actor::Actor;
use crate::policy::{
    self, BucketAction, BucketSnapshot, ItemRequestAction, ItemRequestSnapshot, ProjectAction,
    ProjectSnapshot, ReimbursementAction, ReimbursementSnapshot,
};

/// Actions the actor may currently take on a project.
pub fn project_actions(project: &ProjectSnapshot, actor: &Actor) -> Vec<ProjectAction> {
    ProjectAction::ALL
        .into_iter()
        .filter(|action| policy::project_transition(*action, project, actor).is_ok())
        .collect()
}

/// Actions the actor may currently take on a bucket.
pub fn bucket_actions(bucket: &BucketSnapshot, actor: &Actor) -> Vec<BucketAction> {
    BucketAction::ALL
        .into_iter()
        .filter(|action| policy::bucket_transition(*action, bucket, actor).is_ok())
        .collect()
}

/// Decisions the actor may currently make on an item request.
pub fn item_request_actions(
    request: &ItemRequestSnapshot,
    actor: &Actor,
) -> Vec<ItemRequestAction> {
    ItemRequestAction::ALL
        .into_iter()
        .filter(|action| policy::item_request_decision(*action, request, actor).is_ok())
        .collect()
}

/// Actions the actor may currently take on a reimbursement.
pub fn reimbursement_actions(
    reimbursement: &ReimbursementSnapshot,
    actor: &Actor,
) -> Vec<ReimbursementAction> {
    ReimbursementAction::ALL
        .into_iter()
        .filter(|action| {
            policy::reimbursement_transition(*action, reimbursement, actor).is_ok()
        })
        .collect()
}
