//! # Outbound Ports
//!
//! Dependencies the registry needs from the outside world.

use async_trait::async_trait;
use shared_bus::RegistryEvent;

/// Event log - outbound port.
///
/// Receives one call per qualifying transition, in transition order.
/// Recording is fire-and-forget: an implementation that drops an event must
/// not surface that to the registry.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Record an audit event.
    async fn record(&self, event: RegistryEvent);
}
