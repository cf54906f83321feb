//! Registry configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use property_registry::domain::RegistryConfig;
//!
//! let config = RegistryConfig::new(registry_address, owner)?
//!     .with_controller(controller);
//! ```

use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use shared_types::{is_zero_address, parse_address, Address};
use std::env;

/// Environment variable holding the registry's own address.
pub const ENV_REGISTRY_ADDRESS: &str = "PR_REGISTRY_ADDRESS";
/// Environment variable holding the owner address.
pub const ENV_OWNER: &str = "PR_OWNER";
/// Environment variable holding an optional initial controller.
pub const ENV_CONTROLLER: &str = "PR_CONTROLLER";

/// Identities a registry is deployed with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// The registry's own identity, stamped as `source` on every event.
    pub address: Address,
    /// Fixed owner, allowed to reassign the controller.
    pub owner: Address,
    /// Controller installed at construction. `None` leaves the slot unset.
    pub controller: Option<Address>,
}

impl RegistryConfig {
    /// Create a new configuration with validation
    pub fn new(address: Address, owner: Address) -> Result<Self, ConfigError> {
        let config = Self {
            address,
            owner,
            controller: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from `PR_REGISTRY_ADDRESS`, `PR_OWNER` and optional `PR_CONTROLLER`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let address = required_address(ENV_REGISTRY_ADDRESS)?;
        let owner = required_address(ENV_OWNER)?;
        let controller = match env::var(ENV_CONTROLLER) {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_setting(ENV_CONTROLLER, &raw)?),
            _ => None,
        };

        let config = Self {
            address,
            owner,
            controller,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject zero identities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_zero_address(&self.address) {
            return Err(ConfigError::ZeroAddress(ENV_REGISTRY_ADDRESS));
        }

        if is_zero_address(&self.owner) {
            return Err(ConfigError::ZeroAddress(ENV_OWNER));
        }

        if let Some(controller) = &self.controller {
            if is_zero_address(controller) {
                return Err(ConfigError::ZeroAddress(ENV_CONTROLLER));
            }
        }

        Ok(())
    }

    /// Builder-style method to seed the controller
    pub fn with_controller(mut self, controller: Address) -> Self {
        self.controller = Some(controller);
        self
    }
}

fn required_address(field: &'static str) -> Result<Address, ConfigError> {
    let raw = env::var(field).map_err(|_| ConfigError::Missing(field))?;
    parse_setting(field, &raw)
}

fn parse_setting(field: &'static str, raw: &str) -> Result<Address, ConfigError> {
    parse_address(raw).map_err(|source| ConfigError::InvalidAddress { field, source })
}
