//! # Inbound Ports
//!
//! API trait defining what the property registry can do.

use crate::domain::{PropertyStatus, RegistryError, RegistrySnapshot};
use async_trait::async_trait;
use shared_types::{Address, PropertyId};

/// Property registry API - inbound port.
///
/// Mutations return `Ok(())` on success and `Err` on any rejection; a
/// rejection never changes state.
#[async_trait]
pub trait PropertyRegistryApi: Send + Sync {
    /// Reassign the controller. Owner only; never audited on rejection.
    async fn set_controller(
        &self,
        new_controller: Address,
        caller: Address,
    ) -> Result<(), RegistryError>;

    /// Add a property to the relevant set. Controller only.
    async fn register(&self, property: PropertyId, caller: Address) -> Result<(), RegistryError>;

    /// Remove a property from the relevant set, retiring it to the obsolete
    /// set when `migrate` is true. Controller only.
    async fn remove(
        &self,
        property: PropertyId,
        migrate: bool,
        caller: Address,
    ) -> Result<(), RegistryError>;

    /// Membership in the relevant set.
    async fn is_relevant(&self, property: &PropertyId) -> bool;

    /// Membership in the obsolete set.
    async fn is_obsolete(&self, property: &PropertyId) -> bool;

    /// Whether the property is still an active entry.
    async fn includes(&self, property: &PropertyId) -> bool;

    /// All relevant properties, each exactly once.
    async fn list_relevant(&self) -> Vec<PropertyId>;

    /// All obsolete properties, each exactly once.
    async fn list_obsolete(&self) -> Vec<PropertyId>;

    /// Lifecycle status of a property.
    async fn status(&self, property: &PropertyId) -> PropertyStatus;

    /// Current controller (zero while unset).
    async fn controller(&self) -> Address;

    /// Consistent view of the whole registry.
    async fn snapshot(&self) -> RegistrySnapshot;

    /// Fixed owner.
    fn owner(&self) -> Address;

    /// The registry's own source identity.
    fn address(&self) -> Address;
}
