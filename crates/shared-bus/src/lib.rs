//! # Shared Bus - Event Log for Registry Audit Events
//!
//! The external collaborator the property registry forwards its audit
//! events to. It records every accepted event durably (append-only, in
//! memory) and relays it to live observers.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   Registry   │                    │   Observer   │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │  + history   │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Emitter Authorization
//!
//! A bus built with [`InMemoryEventBus::restricted`] only records events
//! from sources passed to [`InMemoryEventBus::authorize`]. Events from other
//! sources are dropped; the emitter never observes a failure.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, RegistryEvent, UNAUTHORIZED_CALLER};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
