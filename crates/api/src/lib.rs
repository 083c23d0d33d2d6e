//! Clubdesk API server library.
//!
//! Exposes the building blocks (config, state, error handling, auth, routes,
//! router) so integration tests and the binary entrypoint share the exact
//! same application assembly.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;

pub use router::build_app_router;
