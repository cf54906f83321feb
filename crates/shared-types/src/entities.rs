//! # Core Domain Entities
//!
//! Identity primitives shared by the registry and the event log.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `PropertyId`, `ZERO_ADDRESS`
//! - **Roles**: `Role`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::AddressError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 20-byte address-shaped identity.
///
/// Used for accounts (owner, controller, callers), for the registry's own
/// source identity, and for property identifiers.
pub type Address = [u8; 20];

/// Opaque identifier of an external resource tracked by the registry.
pub type PropertyId = Address;

/// The reserved zero address. Never a valid property or controller.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Returns `true` if `address` is the reserved zero value.
#[must_use]
pub fn is_zero_address(address: &Address) -> bool {
    address == &ZERO_ADDRESS
}

/// Format an address as `0x`-prefixed lowercase hex.
#[must_use]
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Parse an address from hex, with or without a `0x` prefix.
pub fn parse_address(input: &str) -> Result<Address, AddressError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != 40 {
        return Err(AddressError::InvalidLength {
            expected: 40,
            got: digits.len(),
        });
    }

    let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
    let mut address = ZERO_ADDRESS;
    address.copy_from_slice(&bytes);
    Ok(address)
}

/// Display wrapper so addresses can be used as `%` fields in tracing macros.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DisplayAddress<'a>(pub &'a Address);

impl fmt::Display for DisplayAddress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// =============================================================================
// CLUSTER B: ROLES
// =============================================================================

/// Privileged roles recognised by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Immutable administrative role; may reassign the controller.
    Owner,
    /// Sole role allowed to register and remove properties.
    Controller,
}

impl Role {
    /// Human-readable role name as carried in role-change events.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Controller => "Controller",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
