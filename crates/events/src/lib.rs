//! Clubdesk event infrastructure.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. Handlers publish a [`DomainEvent`] after each
//!   committed transition; readers consume the resulting snapshot stream.
//! - [`log_events`] — background consumer that mirrors every event into the
//!   tracing log.

pub mod bus;
pub mod logger;

pub use bus::{DomainEvent, EventBus};
pub use logger::log_events;
