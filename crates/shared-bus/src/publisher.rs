//! # Event Publisher
//!
//! Defines the publishing side of the event bus and the in-memory event log.

use crate::events::{EventFilter, RegistryEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use shared_types::{Address, DisplayAddress};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing events to the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event to the bus.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the event.
    async fn publish(&self, event: RegistryEvent) -> usize;

    /// Get the total number of events accepted by the bus.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the event log.
///
/// Keeps an append-only history of every accepted event and relays each one
/// to live subscribers through `tokio::sync::broadcast`.
///
/// A restricted bus only accepts events whose `source` was authorized with
/// [`InMemoryEventBus::authorize`]; anything else is dropped and not recorded.
pub struct InMemoryEventBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<RegistryEvent>,

    /// Append-only record of accepted events.
    history: RwLock<Vec<RegistryEvent>>,

    /// Emitters allowed to publish when `restricted` is set.
    authorized: RwLock<HashSet<Address>>,

    /// Whether publishing requires prior authorization.
    restricted: bool,

    /// Total events accepted.
    events_published: AtomicU64,

    /// Total events dropped for unauthorized sources.
    events_rejected: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create an open event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::build(DEFAULT_CHANNEL_CAPACITY, false)
    }

    /// Create an open event bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(capacity, false)
    }

    /// Create a bus that only accepts events from authorized emitters.
    #[must_use]
    pub fn restricted() -> Self {
        Self::build(DEFAULT_CHANNEL_CAPACITY, true)
    }

    fn build(capacity: usize, restricted: bool) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            history: RwLock::new(Vec::new()),
            authorized: RwLock::new(HashSet::new()),
            restricted,
            events_published: AtomicU64::new(0),
            events_rejected: AtomicU64::new(0),
            capacity,
        }
    }

    /// Allow `emitter` to publish. Returns `false` if it was already allowed.
    pub fn authorize(&self, emitter: Address) -> bool {
        let Ok(mut authorized) = self.authorized.write() else {
            return false;
        };
        let added = authorized.insert(emitter);
        debug!(emitter = %DisplayAddress(&emitter), added, "Emitter authorized");
        added
    }

    /// Withdraw publishing rights from `emitter`.
    pub fn revoke(&self, emitter: &Address) -> bool {
        self.authorized
            .write()
            .map(|mut authorized| authorized.remove(emitter))
            .unwrap_or(false)
    }

    /// Check whether `emitter` may publish on this bus.
    #[must_use]
    pub fn is_authorized(&self, emitter: &Address) -> bool {
        if !self.restricted {
            return true;
        }
        self.authorized
            .read()
            .map(|authorized| authorized.contains(emitter))
            .unwrap_or(false)
    }

    /// Whether this bus requires emitter authorization.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Subscribe to events matching a filter.
    ///
    /// Only events published after this call are delivered; use
    /// [`InMemoryEventBus::history`] for earlier ones.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        debug!(topics = ?filter.topics, "New subscription created");
        Subscription::new(receiver, filter)
    }

    /// Get a stream of events matching a filter.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        debug!(topics = ?filter.topics, "New event stream created");
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// All accepted events, in acceptance order.
    #[must_use]
    pub fn history(&self) -> Vec<RegistryEvent> {
        self.history
            .read()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    /// Accepted events matching `filter`, in acceptance order.
    #[must_use]
    pub fn history_matching(&self, filter: &EventFilter) -> Vec<RegistryEvent> {
        self.history
            .read()
            .map(|history| {
                history
                    .iter()
                    .filter(|event| filter.matches(event))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Accepted events emitted by `source`.
    #[must_use]
    pub fn history_for(&self, source: &Address) -> Vec<RegistryEvent> {
        self.history_matching(&EventFilter::from_sources(vec![*source]))
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.read().map(|h| h.len()).unwrap_or(0)
    }

    /// Whether no event has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total events dropped because their source was not authorized.
    #[must_use]
    pub fn events_rejected(&self) -> u64 {
        self.events_rejected.load(Ordering::Relaxed)
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: RegistryEvent) -> usize {
        let topic = event.topic();
        let source = event.source();

        if !self.is_authorized(&source) {
            self.events_rejected.fetch_add(1, Ordering::Relaxed);
            warn!(
                topic = ?topic,
                source = %DisplayAddress(&source),
                event = event.name(),
                "Event dropped (emitter not authorized)"
            );
            return 0;
        }

        match self.history.write() {
            Ok(mut history) => history.push(event.clone()),
            Err(_) => warn!(event = event.name(), "Event history poisoned, not recorded"),
        }
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    topic = ?topic,
                    source = %DisplayAddress(&source),
                    receivers = receiver_count,
                    "Event published"
                );
                receiver_count
            }
            Err(_) => {
                // Recorded in history; nobody listening live.
                debug!(topic = ?topic, "Event recorded (no live receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
