pub mod buckets;
pub mod health;
pub mod inventory;
pub mod items;
pub mod projects;
pub mod reimbursements;
pub mod users;
