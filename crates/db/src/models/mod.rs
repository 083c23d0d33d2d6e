//! Entity models and request DTOs.
//!
//! Each row struct derives `FromRow` and keeps its status as the raw wire
//! string; the core status enums parse it at the policy boundary. DTOs carry
//! `validator` derives and are validated in the handlers before any write.

pub mod inventory;
pub mod procurement;
pub mod project;
pub mod reimbursement;
pub mod user;
