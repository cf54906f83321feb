//! # Property Registry
//!
//! Access-controlled registry of property identifiers with a relevant and an
//! obsolete set, audited through an append-only event log.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `RegistryState`: Controller slot plus relevant/obsolete sets
//!   - `RegistryConfig`: Deployment identities with validation
//!   - Invariant checks for zero inputs and role gating
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `PropertyRegistryApi`: Driving port (inbound API)
//!   - `EventLog`: Driven port (audit event sink)
//!
//! - **Service Layer** (`service`): Orchestration
//!   - `PropertyRegistryService`: Implements `PropertyRegistryApi`
//!
//! - **Adapters Layer** (`adapters/`): External connections
//!   - `BusEventLog`: Publishes to the shared event bus
//!   - `InMemoryEventLog`: Recording sink for tests
//!
//! ## Roles
//!
//! - **Owner**: fixed at construction, reassigns the controller
//! - **Controller**: registers and removes properties
//!
//! ## Invariants
//!
//! - The zero address is never a property or a controller.
//! - A property enters `obsolete` only through `remove(.., migrate = true)`
//!   and never leaves it.
//! - Every successful mutation emits exactly one event; events appear in
//!   the order the transitions happened.
//!
//! ## Usage Example
//!
//! ```ignore
//! use property_registry::{BusEventLog, PropertyRegistryApi, PropertyRegistryService, RegistryConfig};
//! use shared_bus::InMemoryEventBus;
//! use std::sync::Arc;
//!
//! let bus = Arc::new(InMemoryEventBus::new());
//! let config = RegistryConfig::new(registry_address, owner)?;
//! let registry = PropertyRegistryService::new(config, Arc::new(BusEventLog::new(bus.clone())))?;
//!
//! registry.set_controller(controller, owner).await?;
//! registry.register(property, controller).await?;
//! assert!(registry.is_relevant(&property).await);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{BusEventLog, InMemoryEventLog};
pub use domain::{
    ConfigError, PropertyStatus, RegistryConfig, RegistryError, RegistrySnapshot, RegistryState,
    Removal,
};
pub use ports::{EventLog, PropertyRegistryApi};
pub use service::PropertyRegistryService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
