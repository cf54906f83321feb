//! In-memory event log for isolated tests.

use crate::ports::outbound::EventLog;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::RegistryEvent;

/// Records every event it receives, in order.
#[derive(Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<RegistryEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded events.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Number of recorded events with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }

    /// Messages of all recorded `Error` events.
    pub fn error_messages(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RegistryEvent::Error { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Most recent event, if any.
    pub fn last(&self) -> Option<RegistryEvent> {
        self.events.lock().last().cloned()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn record(&self, event: RegistryEvent) {
        self.events.lock().push(event);
    }
}
