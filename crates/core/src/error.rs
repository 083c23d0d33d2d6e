use crate::types::EntityId;

/// Domain-level error taxonomy.
///
/// Every failure kind is scoped to the single requested operation; nothing
/// here is fatal to the process and nothing is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The actor lacks the permission, role, or identity the transition
    /// requires.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No edge exists from the entity's current status to the requested one.
    #[error("Invalid transition for {entity}: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },

    /// The conditional update was rejected because the status changed since
    /// it was last read. The caller must re-read and re-offer a fresh action
    /// set; no automatic retry.
    #[error("Stale state for {entity}: expected {expected}, found {actual}")]
    StaleState {
        entity: &'static str,
        expected: String,
        actual: String,
    },

    /// A collaborator side effect failed; the whole transition rolled back
    /// and the original status is intact.
    #[error("Dependency failure: {0}")]
    Dependency(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
