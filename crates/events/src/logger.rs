//! Background event logger.

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use crate::bus::DomainEvent;

/// Drain a bus receiver into the tracing log until the bus is dropped.
///
/// Spawned once from the binary entrypoint. Lagging only skips log lines,
/// never application state.
pub async fn log_events(mut receiver: Receiver<DomainEvent>) {
    loop {
        match receiver.recv().await {
            Ok(event) => {
                tracing::info!(
                    event_type = %event.event_type,
                    entity_kind = event.entity_kind.as_deref().unwrap_or("-"),
                    entity_id = ?event.entity_id,
                    actor_id = ?event.actor_id,
                    "domain event"
                );
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event logger lagged behind the bus");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
