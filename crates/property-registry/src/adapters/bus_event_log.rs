//! Event Bus Adapter
//!
//! Implements the `EventLog` port on top of the shared bus, so registry
//! audit events land in the bus history and reach live subscribers.

use crate::ports::outbound::EventLog;
use async_trait::async_trait;
use shared_bus::{EventPublisher, RegistryEvent};
use shared_types::DisplayAddress;
use std::sync::Arc;
use tracing::debug;

/// Forwards registry events to an [`EventPublisher`].
pub struct BusEventLog<P: EventPublisher> {
    bus: Arc<P>,
}

impl<P: EventPublisher> BusEventLog<P> {
    /// Wrap a publisher.
    pub fn new(bus: Arc<P>) -> Self {
        Self { bus }
    }

    /// The underlying publisher.
    pub fn bus(&self) -> &Arc<P> {
        &self.bus
    }
}

impl<P: EventPublisher> Clone for BusEventLog<P> {
    fn clone(&self) -> Self {
        Self {
            bus: Arc::clone(&self.bus),
        }
    }
}

#[async_trait]
impl<P: EventPublisher + 'static> EventLog for BusEventLog<P> {
    async fn record(&self, event: RegistryEvent) {
        let name = event.name();
        let source = event.source();
        let receivers = self.bus.publish(event).await;
        debug!(
            event = name,
            source = %DisplayAddress(&source),
            receivers,
            "Forwarded registry event to bus"
        );
    }
}
