//! # Domain Entities
//!
//! The registry aggregate: the controller slot plus the two membership sets.
//!
//! Identifiers move `unknown → relevant → {unknown | obsolete}`. Nothing in
//! this module checks authorization; that happens in the service before any
//! of these mutators are reached.

use serde::{Deserialize, Serialize};
use shared_types::{Address, PropertyId, ZERO_ADDRESS};
use std::collections::BTreeSet;

/// Where a property currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyStatus {
    /// Never registered, or removed without migration.
    Unknown,
    /// Currently active.
    Relevant,
    /// Retired via migration.
    Obsolete,
}

/// Outcome of retiring a property from the relevant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    /// The property was a member of `relevant` before the call.
    pub was_relevant: bool,
    /// The property entered `obsolete` during the call.
    pub newly_obsolete: bool,
}

/// Mutable registry state guarded by the service lock.
#[derive(Debug, Clone, Default)]
pub struct RegistryState {
    /// Current controller; zero while unset.
    controller: Address,
    /// Active properties.
    relevant: BTreeSet<PropertyId>,
    /// Properties retired via migration. Only ever grows.
    obsolete: BTreeSet<PropertyId>,
}

impl RegistryState {
    /// Empty registry with no controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry with a pre-seeded controller.
    pub fn with_controller(controller: Address) -> Self {
        Self {
            controller,
            ..Self::default()
        }
    }

    /// Current controller (zero while unset).
    pub fn controller(&self) -> Address {
        self.controller
    }

    /// Whether a controller has been assigned.
    pub fn has_controller(&self) -> bool {
        self.controller != ZERO_ADDRESS
    }

    /// Overwrite the controller, returning the previous holder.
    pub fn replace_controller(&mut self, controller: Address) -> Address {
        std::mem::replace(&mut self.controller, controller)
    }

    /// Insert into `relevant`. Returns `false` if already present.
    pub fn insert_relevant(&mut self, property: PropertyId) -> bool {
        self.relevant.insert(property)
    }

    /// Drop from `relevant` and, when `migrate` is set, record in `obsolete`.
    pub fn retire(&mut self, property: &PropertyId, migrate: bool) -> Removal {
        let was_relevant = self.relevant.remove(property);
        let newly_obsolete = migrate && self.obsolete.insert(*property);
        Removal {
            was_relevant,
            newly_obsolete,
        }
    }

    /// Membership in `relevant`.
    pub fn is_relevant(&self, property: &PropertyId) -> bool {
        self.relevant.contains(property)
    }

    /// Membership in `obsolete`.
    pub fn is_obsolete(&self, property: &PropertyId) -> bool {
        self.obsolete.contains(property)
    }

    /// Lifecycle status. `Relevant` wins if both memberships hold.
    pub fn status(&self, property: &PropertyId) -> PropertyStatus {
        if self.is_relevant(property) {
            PropertyStatus::Relevant
        } else if self.is_obsolete(property) {
            PropertyStatus::Obsolete
        } else {
            PropertyStatus::Unknown
        }
    }

    /// Relevant properties in ascending order.
    pub fn relevant(&self) -> impl Iterator<Item = &PropertyId> {
        self.relevant.iter()
    }

    /// Obsolete properties in ascending order.
    pub fn obsolete(&self) -> impl Iterator<Item = &PropertyId> {
        self.obsolete.iter()
    }

    pub fn relevant_len(&self) -> usize {
        self.relevant.len()
    }

    pub fn obsolete_len(&self) -> usize {
        self.obsolete.len()
    }
}

/// Consistent, serializable view of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Registry source identity.
    pub address: Address,
    /// Fixed owner.
    pub owner: Address,
    /// Controller at snapshot time.
    pub controller: Address,
    /// Relevant properties, ascending.
    pub relevant: Vec<PropertyId>,
    /// Obsolete properties, ascending.
    pub obsolete: Vec<PropertyId>,
}

impl RegistrySnapshot {
    /// Capture `state` together with the registry's fixed identities.
    pub fn capture(address: Address, owner: Address, state: &RegistryState) -> Self {
        Self {
            address,
            owner,
            controller: state.controller(),
            relevant: state.relevant().copied().collect(),
            obsolete: state.obsolete().copied().collect(),
        }
    }
}
