//! # Domain Invariants
//!
//! Business rules for the property registry.
//!
//! - Zero is never a valid property or controller.
//! - Only the owner reassigns the controller.
//! - Only the controller registers and removes properties. An unset (zero)
//!   controller authorizes nobody.
//! - `relevant` and `obsolete` are disjoint along register → remove.

use super::entities::RegistryState;
use super::errors::RegistryError;
use shared_types::{is_zero_address, Address, PropertyId, Role};

/// Invariant: property identifiers are non-zero.
pub fn invariant_non_zero_property(property: &PropertyId) -> Result<(), RegistryError> {
    if is_zero_address(property) {
        return Err(RegistryError::ZeroProperty);
    }
    Ok(())
}

/// Invariant: controller assignments are non-zero.
pub fn invariant_non_zero_controller(controller: &Address) -> Result<(), RegistryError> {
    if is_zero_address(controller) {
        return Err(RegistryError::ZeroController);
    }
    Ok(())
}

/// Invariant: caller holds the owner role.
pub fn invariant_owner_caller(owner: &Address, caller: &Address) -> Result<(), RegistryError> {
    if is_zero_address(caller) || caller != owner {
        return Err(RegistryError::Unauthorized {
            caller: *caller,
            required: Role::Owner,
        });
    }
    Ok(())
}

/// Invariant: caller holds the controller role.
pub fn invariant_controller_caller(
    state: &RegistryState,
    caller: &Address,
) -> Result<(), RegistryError> {
    if !state.has_controller() || *caller != state.controller() {
        return Err(RegistryError::Unauthorized {
            caller: *caller,
            required: Role::Controller,
        });
    }
    Ok(())
}

/// Properties that are currently both relevant and obsolete.
///
/// Empty unless an obsolete property was registered again.
pub fn overlapping_properties(state: &RegistryState) -> Vec<PropertyId> {
    state
        .relevant()
        .filter(|property| state.is_obsolete(property))
        .copied()
        .collect()
}

/// Invariant: `relevant ∩ obsolete = ∅`.
pub fn invariant_sets_disjoint(state: &RegistryState) -> bool {
    overlapping_properties(state).is_empty()
}
