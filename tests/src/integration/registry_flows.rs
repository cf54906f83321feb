//! # Registry Flows
//!
//! End-to-end flows through `PropertyRegistryService` with events forwarded
//! to `InMemoryEventBus` via `BusEventLog`.
//!
//! ## Flows Tested:
//!
//! 1. **Lifecycle**: register, remove, migrate, list
//! 2. **Audit trail**: unauthorized calls land on the bus as `Error` events
//! 3. **Bus delivery**: subscriptions, streams and emitter authorization
//! 4. **Configuration**: registry built from `PR_*` environment variables

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    // Shared infrastructure
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, RegistryEvent, UNAUTHORIZED_CALLER};
    use shared_types::{format_address, Address, PropertyId, ZERO_ADDRESS};

    // Property registry
    use property_registry::{
        BusEventLog, PropertyRegistryApi, PropertyRegistryService, PropertyStatus, RegistryConfig,
        RegistryError,
    };

    // Telemetry
    use registry_telemetry::{init_telemetry, TelemetryConfig};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const REGISTRY: Address = [0x11; 20];
    const OWNER: Address = [0x01; 20];
    const UNAUTHORIZED: Address = [0x02; 20];
    const CONTROLLER: Address = [0x05; 20];

    const P1: PropertyId = [0xa1; 20];
    const P2: PropertyId = [0xa2; 20];
    const P3: PropertyId = [0xa3; 20];

    type BusRegistry = PropertyRegistryService<BusEventLog<InMemoryEventBus>>;

    /// Registry on an open bus with `CONTROLLER` seeded from configuration.
    fn create_registry() -> (BusRegistry, Arc<InMemoryEventBus>) {
        let _ = init_telemetry(TelemetryConfig::for_tests());

        let bus = Arc::new(InMemoryEventBus::new());
        let config = RegistryConfig::new(REGISTRY, OWNER)
            .expect("valid config")
            .with_controller(CONTROLLER);
        let registry = PropertyRegistryService::new(config, Arc::new(BusEventLog::new(bus.clone())))
            .expect("registry");
        (registry, bus)
    }

    fn removed_events_for(bus: &InMemoryEventBus, property: PropertyId) -> usize {
        bus.history()
            .iter()
            .filter(|event| {
                matches!(event, RegistryEvent::PropertyRemoved { property: p, .. } if *p == property)
            })
            .count()
    }

    // =============================================================================
    // LIFECYCLE FLOWS
    // =============================================================================

    /// Three registrations produce three relevant entries.
    #[tokio::test]
    async fn test_register_three_properties() {
        let (registry, bus) = create_registry();

        for property in [P1, P2, P3] {
            assert!(registry.register(property, CONTROLLER).await.is_ok());
        }

        let relevant = registry.list_relevant().await;
        assert_eq!(relevant.len(), 3);
        for property in &relevant {
            assert!(registry.is_relevant(property).await);
        }
        assert_eq!(bus.len(), 3);
    }

    /// Register then migrate one property.
    #[tokio::test]
    async fn test_register_then_migrate() {
        let (registry, bus) = create_registry();

        registry.register(P1, CONTROLLER).await.unwrap();
        registry.remove(P1, true, CONTROLLER).await.unwrap();

        assert!(!registry.is_relevant(&P1).await);
        assert!(registry.is_obsolete(&P1).await);
        assert_eq!(removed_events_for(&bus, P1), 1);
        assert_eq!(
            bus.history(),
            vec![
                RegistryEvent::PropertyRegistered {
                    source: REGISTRY,
                    property: P1,
                },
                RegistryEvent::PropertyRemoved {
                    source: REGISTRY,
                    property: P1,
                },
            ]
        );
    }

    /// Register three, migrate three.
    #[tokio::test]
    async fn test_migrate_all_properties() {
        let (registry, bus) = create_registry();

        for property in [P1, P2, P3] {
            registry.register(property, CONTROLLER).await.unwrap();
        }
        for property in [P1, P2, P3] {
            registry.remove(property, true, CONTROLLER).await.unwrap();
        }

        assert_eq!(registry.list_obsolete().await.len(), 3);
        assert!(registry.list_relevant().await.is_empty());

        let lifecycle = bus.history_matching(&EventFilter::topics(vec![EventTopic::Lifecycle]));
        assert_eq!(lifecycle.len(), 6);
    }

    /// A non-controller cannot register, and the attempt is audited.
    #[tokio::test]
    async fn test_unauthorized_register_is_audited() {
        let (registry, bus) = create_registry();

        let result = registry.register(P1, UNAUTHORIZED).await;

        assert!(result.is_err());
        assert!(!registry.is_relevant(&P1).await);

        let errors = bus.history_matching(&EventFilter::topics(vec![EventTopic::Errors]));
        assert_eq!(
            errors,
            vec![RegistryEvent::Error {
                source: REGISTRY,
                message: UNAUTHORIZED_CALLER.to_string(),
            }]
        );
        assert_eq!(bus.len(), 1);
    }

    /// Retired properties can come back; both memberships hold afterwards.
    #[tokio::test]
    async fn test_reregister_obsolete_property() {
        let (registry, bus) = create_registry();

        registry.register(P1, CONTROLLER).await.unwrap();
        registry.remove(P1, true, CONTROLLER).await.unwrap();
        registry.register(P1, CONTROLLER).await.unwrap();

        assert_eq!(registry.status(&P1).await, PropertyStatus::Relevant);
        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.relevant, vec![P1]);
        assert_eq!(snapshot.obsolete, vec![P1]);
        assert_eq!(bus.len(), 3);
    }

    // =============================================================================
    // ROLE FLOWS
    // =============================================================================

    /// Controller handover: the old controller loses access immediately.
    #[tokio::test]
    async fn test_controller_handover() {
        let (registry, bus) = create_registry();
        let successor: Address = [0x06; 20];

        registry.set_controller(successor, OWNER).await.unwrap();

        assert!(registry.register(P1, CONTROLLER).await.is_err());
        assert!(registry.register(P2, successor).await.is_ok());

        let roles = bus.history_matching(&EventFilter::topics(vec![EventTopic::Roles]));
        assert_eq!(
            roles,
            vec![RegistryEvent::ControllerChanged {
                source: REGISTRY,
                role_name: "Controller".to_string(),
                old_value: CONTROLLER,
                new_value: successor,
            }]
        );
        assert_eq!(registry.list_relevant().await, vec![P2]);
    }

    /// Rejected controller changes leave no trace on the bus.
    #[tokio::test]
    async fn test_rejected_controller_change_not_audited() {
        let (registry, bus) = create_registry();

        let err = registry
            .set_controller(UNAUTHORIZED, UNAUTHORIZED)
            .await
            .unwrap_err();
        assert!(!err.is_audited());
        assert_eq!(
            registry.set_controller(ZERO_ADDRESS, OWNER).await,
            Err(RegistryError::ZeroController)
        );

        assert!(bus.is_empty());
        assert_eq!(registry.controller().await, CONTROLLER);
    }

    // =============================================================================
    // BUS DELIVERY
    // =============================================================================

    /// Live subscribers see lifecycle events in transition order.
    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let (registry, bus) = create_registry();
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Lifecycle]));

        registry.register(P1, CONTROLLER).await.unwrap();
        registry.register(P2, CONTROLLER).await.unwrap();
        registry.remove(P1, false, CONTROLLER).await.unwrap();

        let mut received = Vec::new();
        for _ in 0..3 {
            let event = timeout(Duration::from_millis(100), sub.recv())
                .await
                .expect("timeout waiting for event")
                .expect("should receive event");
            received.push((event.name(), event.property()));
        }

        assert_eq!(
            received,
            vec![
                ("PropertyRegistered", Some(P1)),
                ("PropertyRegistered", Some(P2)),
                ("PropertyRemoved", Some(P1)),
            ]
        );
    }

    /// Streams filtered by source only see this registry's events.
    #[tokio::test]
    async fn test_event_stream_filters_by_source() {
        let (registry, bus) = create_registry();
        let other_registry: Address = [0x22; 20];
        let other = PropertyRegistryService::new(
            RegistryConfig::new(other_registry, OWNER)
                .unwrap()
                .with_controller(CONTROLLER),
            Arc::new(BusEventLog::new(bus.clone())),
        )
        .unwrap();

        let mut stream = bus.event_stream(EventFilter::from_sources(vec![REGISTRY]));

        other.register(P3, CONTROLLER).await.unwrap();
        registry.register(P1, CONTROLLER).await.unwrap();

        let event = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(event.source(), REGISTRY);
        assert_eq!(event.property(), Some(P1));

        assert_eq!(bus.history_for(&other_registry).len(), 1);
        assert_eq!(bus.history_for(&REGISTRY).len(), 1);
    }

    /// A restricted bus records only authorized registries.
    #[tokio::test]
    async fn test_restricted_bus_requires_authorization() {
        let bus = Arc::new(InMemoryEventBus::restricted());
        let config = RegistryConfig::new(REGISTRY, OWNER)
            .unwrap()
            .with_controller(CONTROLLER);
        let registry =
            PropertyRegistryService::new(config, Arc::new(BusEventLog::new(bus.clone()))).unwrap();

        // State changes even when the log drops the event.
        registry.register(P1, CONTROLLER).await.unwrap();
        assert!(registry.is_relevant(&P1).await);
        assert!(bus.is_empty());
        assert_eq!(bus.events_rejected(), 1);

        assert!(bus.authorize(REGISTRY));
        registry.register(P2, CONTROLLER).await.unwrap();
        assert_eq!(bus.history_for(&REGISTRY).len(), 1);

        assert!(bus.revoke(&REGISTRY));
        registry.remove(P2, false, CONTROLLER).await.unwrap();
        assert_eq!(bus.len(), 1);
    }

    // =============================================================================
    // CONFIGURATION
    // =============================================================================

    /// The registry can be deployed entirely from environment variables.
    #[tokio::test]
    async fn test_registry_from_env() {
        std::env::set_var("PR_REGISTRY_ADDRESS", format_address(&REGISTRY));
        std::env::set_var("PR_OWNER", format_address(&OWNER));
        std::env::set_var("PR_CONTROLLER", format_address(&CONTROLLER));

        let config = RegistryConfig::from_env().expect("config from env");

        std::env::remove_var("PR_REGISTRY_ADDRESS");
        std::env::remove_var("PR_OWNER");
        std::env::remove_var("PR_CONTROLLER");

        assert_eq!(config.address, REGISTRY);
        assert_eq!(config.owner, OWNER);
        assert_eq!(config.controller, Some(CONTROLLER));

        let bus = Arc::new(InMemoryEventBus::new());
        let registry =
            PropertyRegistryService::new(config, Arc::new(BusEventLog::new(bus.clone()))).unwrap();
        assert!(registry.register(P1, CONTROLLER).await.is_ok());
        assert_eq!(registry.owner(), OWNER);
        assert_eq!(registry.address(), REGISTRY);
    }
}
