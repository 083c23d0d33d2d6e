//! Clubdesk domain core.
//!
//! Pure business-rule layer for the club management backend: status enums,
//! the actor/capability model, the lifecycle transition policy, the action
//! gate that drives UI affordances, and the transition executor that applies
//! validated transitions through a [`LifecycleStore`].
//!
//! This crate is deliberately free of any web or database dependency so the
//! entire policy is testable without a UI or storage harness.

pub mod actor;
pub mod error;
pub mod executor;
pub mod gate;
pub mod policy;
pub mod status;
pub mod types;

pub use actor::{Actor, Capability, Role};
pub use error::CoreError;
pub use executor::{LifecycleStore, TransitionExecutor};
