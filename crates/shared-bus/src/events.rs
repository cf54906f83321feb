//! # Registry Events
//!
//! Defines all event types that flow through the shared bus.
//! Every event carries the `source` address of the registry that emitted it.

use serde::{Deserialize, Serialize};
use shared_types::{Address, PropertyId};

/// Literal message carried by `Error` events for rejected callers.
pub const UNAUTHORIZED_CALLER: &str = "Unauthorized caller.";

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    // =========================================================================
    // ROLES
    // =========================================================================
    /// A role slot was reassigned.
    ControllerChanged {
        /// Registry that emitted the event.
        source: Address,
        /// Name of the reassigned role (always "Controller").
        role_name: String,
        /// Previous holder (zero when unset).
        old_value: Address,
        /// New holder.
        new_value: Address,
    },

    // =========================================================================
    // PROPERTY LIFECYCLE
    // =========================================================================
    /// A property entered the relevant set.
    PropertyRegistered {
        /// Registry that emitted the event.
        source: Address,
        /// The registered property.
        property: PropertyId,
    },

    /// A property left the relevant set (deleted or migrated).
    PropertyRemoved {
        /// Registry that emitted the event.
        source: Address,
        /// The removed property.
        property: PropertyId,
    },

    // =========================================================================
    // AUDIT
    // =========================================================================
    /// An operation was rejected and the rejection is audited.
    Error {
        /// Registry that emitted the event.
        source: Address,
        /// Human-readable reason.
        message: String,
    },
}

impl RegistryEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ControllerChanged { .. } => EventTopic::Roles,
            Self::PropertyRegistered { .. } | Self::PropertyRemoved { .. } => {
                EventTopic::Lifecycle
            }
            Self::Error { .. } => EventTopic::Errors,
        }
    }

    /// Get the emitting registry address.
    #[must_use]
    pub fn source(&self) -> Address {
        match self {
            Self::ControllerChanged { source, .. }
            | Self::PropertyRegistered { source, .. }
            | Self::PropertyRemoved { source, .. }
            | Self::Error { source, .. } => *source,
        }
    }

    /// Short event name, as used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ControllerChanged { .. } => "ControllerChanged",
            Self::PropertyRegistered { .. } => "PropertyRegistered",
            Self::PropertyRemoved { .. } => "PropertyRemoved",
            Self::Error { .. } => "Error",
        }
    }

    /// The property this event refers to, if any.
    #[must_use]
    pub fn property(&self) -> Option<PropertyId> {
        match self {
            Self::PropertyRegistered { property, .. } | Self::PropertyRemoved { property, .. } => {
                Some(*property)
            }
            _ => None,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Role reassignment events.
    Roles,
    /// Property registration and removal events.
    Lifecycle,
    /// Audited rejections.
    Errors,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source registries to include. Empty means all sources.
    pub sources: Vec<Address>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            sources: Vec::new(),
        }
    }

    /// Create a filter for events from specific registries.
    #[must_use]
    pub fn from_sources(sources: Vec<Address>) -> Self {
        Self {
            topics: Vec::new(),
            sources,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &RegistryEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.sources.is_empty() || self.sources.contains(&event.source());

        topic_match && source_match
    }
}
