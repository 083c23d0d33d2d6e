//! Repositories: stateless structs providing the SQL for each entity.
//!
//! Transition writes live in [`crate::store`]; repositories cover creation,
//! listing, membership, and the inventory return path.

pub mod bucket_repo;
pub mod inventory_repo;
pub mod item_request_repo;
pub mod project_repo;
pub mod reimbursement_repo;
pub mod user_repo;

pub use bucket_repo::BucketRepo;
pub use inventory_repo::InventoryRepo;
pub use item_request_repo::ItemRequestRepo;
pub use project_repo::ProjectRepo;
pub use reimbursement_repo::ReimbursementRepo;
pub use user_repo::UserRepo;
