//! # Property Registry Service
//!
//! Implements `PropertyRegistryApi` over a single `RegistryState` aggregate
//! and forwards audit events through the injected `EventLog` port.
//!
//! ## Concurrency
//!
//! Mutations hold the write lock across check, mutate and emit, so two
//! mutations never interleave and their events reach the log in the order
//! the transitions happened. Reads take the read lock and see a consistent
//! state.
//!
//! ## Rejections
//!
//! | Operation | Zero argument | Wrong caller |
//! |-----------|---------------|--------------|
//! | `set_controller` | silent | silent |
//! | `register` | silent | `Error` event |
//! | `remove` | silent | `Error` event |

use crate::domain::{
    invariant_controller_caller, invariant_non_zero_controller, invariant_non_zero_property,
    invariant_owner_caller, ConfigError, PropertyStatus, RegistryConfig, RegistryError,
    RegistrySnapshot, RegistryState,
};
use crate::ports::inbound::PropertyRegistryApi;
use crate::ports::outbound::EventLog;

use async_trait::async_trait;
use registry_telemetry::{
    log_event, log_property_event, metric_inc, metric_set, time_operation, CONTROLLER_CHANGES,
    EVENTS_EMITTED, INVALID_INPUTS, OBSOLETE_PROPERTIES, PROPERTIES_REGISTERED,
    PROPERTIES_REMOVED, RELEVANT_PROPERTIES, UNAUTHORIZED_ATTEMPTS,
};
use shared_bus::{RegistryEvent, UNAUTHORIZED_CALLER};
use shared_types::{Address, DisplayAddress, PropertyId, Role};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// The property registry.
pub struct PropertyRegistryService<L: EventLog> {
    /// Source identity stamped on every event.
    address: Address,
    /// Fixed owner.
    owner: Address,
    /// Controller slot and membership sets.
    state: RwLock<RegistryState>,
    /// Audit event sink.
    event_log: Arc<L>,
}

impl<L: EventLog> PropertyRegistryService<L> {
    /// Create a registry from a validated configuration.
    ///
    /// A controller seeded through the configuration is installed without
    /// emitting a `ControllerChanged` event.
    pub fn new(config: RegistryConfig, event_log: Arc<L>) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = match config.controller {
            Some(controller) => RegistryState::with_controller(controller),
            None => RegistryState::new(),
        };

        log_event!(
            info,
            "registry",
            "Property registry created",
            registry = %DisplayAddress(&config.address),
            owner = %DisplayAddress(&config.owner),
            controller_seeded = config.controller.is_some()
        );

        Ok(Self {
            address: config.address,
            owner: config.owner,
            state: RwLock::new(state),
            event_log,
        })
    }

    /// The injected event log.
    pub fn event_log(&self) -> &Arc<L> {
        &self.event_log
    }

    async fn emit(&self, event: RegistryEvent) {
        metric_inc!(EVENTS_EMITTED, &[event.name()]);
        self.event_log.record(event).await;
    }

    async fn emit_unauthorized(&self) {
        self.emit(RegistryEvent::Error {
            source: self.address,
            message: UNAUTHORIZED_CALLER.to_string(),
        })
        .await;
    }

    fn update_gauges(state: &RegistryState) {
        metric_set!(RELEVANT_PROPERTIES, state.relevant_len() as f64);
        metric_set!(OBSOLETE_PROPERTIES, state.obsolete_len() as f64);
    }
}

#[async_trait]
impl<L: EventLog + 'static> PropertyRegistryApi for PropertyRegistryService<L> {
    async fn set_controller(
        &self,
        new_controller: Address,
        caller: Address,
    ) -> Result<(), RegistryError> {
        let _timer = time_operation!("set_controller");

        if let Err(err) = invariant_non_zero_controller(&new_controller) {
            metric_inc!(INVALID_INPUTS, &["set_controller"]);
            debug!(caller = %DisplayAddress(&caller), "Ignoring zero controller");
            return Err(err);
        }

        let mut state = self.state.write().await;

        if let Err(err) = invariant_owner_caller(&self.owner, &caller) {
            metric_inc!(UNAUTHORIZED_ATTEMPTS, &["set_controller"]);
            warn!(
                caller = %DisplayAddress(&caller),
                "Rejected controller change from non-owner"
            );
            return Err(err);
        }

        let old_value = state.replace_controller(new_controller);
        metric_inc!(CONTROLLER_CHANGES);
        info!(
            old = %DisplayAddress(&old_value),
            new = %DisplayAddress(&new_controller),
            "Controller changed"
        );

        self.emit(RegistryEvent::ControllerChanged {
            source: self.address,
            role_name: Role::Controller.name().to_string(),
            old_value,
            new_value: new_controller,
        })
        .await;

        Ok(())
    }

    async fn register(&self, property: PropertyId, caller: Address) -> Result<(), RegistryError> {
        let _timer = time_operation!("register");

        if let Err(err) = invariant_non_zero_property(&property) {
            metric_inc!(INVALID_INPUTS, &["register"]);
            debug!(caller = %DisplayAddress(&caller), "Ignoring zero property");
            return Err(err);
        }

        let mut state = self.state.write().await;

        if let Err(err) = invariant_controller_caller(&state, &caller) {
            metric_inc!(UNAUTHORIZED_ATTEMPTS, &["register"]);
            log_property_event!(
                warn,
                "Rejected register from unauthorized caller",
                DisplayAddress(&property),
                DisplayAddress(&caller)
            );
            self.emit_unauthorized().await;
            return Err(err);
        }

        if state.is_obsolete(&property) {
            // Not guarded: the property becomes relevant while staying obsolete.
            log_property_event!(
                warn,
                "Registering a property that is already obsolete",
                DisplayAddress(&property),
                DisplayAddress(&caller)
            );
        }

        let inserted = state.insert_relevant(property);
        Self::update_gauges(&state);
        metric_inc!(PROPERTIES_REGISTERED);
        log_property_event!(
            debug,
            "Property registered",
            DisplayAddress(&property),
            DisplayAddress(&caller),
            newly_inserted = inserted
        );

        self.emit(RegistryEvent::PropertyRegistered {
            source: self.address,
            property,
        })
        .await;

        Ok(())
    }

    async fn remove(
        &self,
        property: PropertyId,
        migrate: bool,
        caller: Address,
    ) -> Result<(), RegistryError> {
        let _timer = time_operation!("remove");

        if let Err(err) = invariant_non_zero_property(&property) {
            metric_inc!(INVALID_INPUTS, &["remove"]);
            debug!(caller = %DisplayAddress(&caller), "Ignoring zero property");
            return Err(err);
        }

        let mut state = self.state.write().await;

        if let Err(err) = invariant_controller_caller(&state, &caller) {
            metric_inc!(UNAUTHORIZED_ATTEMPTS, &["remove"]);
            log_property_event!(
                warn,
                "Rejected remove from unauthorized caller",
                DisplayAddress(&property),
                DisplayAddress(&caller),
                migrate = migrate
            );
            self.emit_unauthorized().await;
            return Err(err);
        }

        let removal = state.retire(&property, migrate);
        Self::update_gauges(&state);
        metric_inc!(PROPERTIES_REMOVED, &[if migrate { "true" } else { "false" }]);
        log_property_event!(
            debug,
            "Property removed",
            DisplayAddress(&property),
            DisplayAddress(&caller),
            migrate = migrate,
            was_relevant = removal.was_relevant,
            newly_obsolete = removal.newly_obsolete
        );

        self.emit(RegistryEvent::PropertyRemoved {
            source: self.address,
            property,
        })
        .await;

        Ok(())
    }

    async fn is_relevant(&self, property: &PropertyId) -> bool {
        self.state.read().await.is_relevant(property)
    }

    async fn is_obsolete(&self, property: &PropertyId) -> bool {
        self.state.read().await.is_obsolete(property)
    }

    async fn includes(&self, property: &PropertyId) -> bool {
        self.is_relevant(property).await
    }

    async fn list_relevant(&self) -> Vec<PropertyId> {
        self.state.read().await.relevant().copied().collect()
    }

    async fn list_obsolete(&self) -> Vec<PropertyId> {
        self.state.read().await.obsolete().copied().collect()
    }

    async fn status(&self, property: &PropertyId) -> PropertyStatus {
        self.state.read().await.status(property)
    }

    async fn controller(&self) -> Address {
        self.state.read().await.controller()
    }

    async fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read().await;
        RegistrySnapshot::capture(self.address, self.owner, &state)
    }

    fn owner(&self) -> Address {
        self.owner
    }

    fn address(&self) -> Address {
        self.address
    }
}
