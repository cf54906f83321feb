//! # Domain Errors
//!
//! Error types for the property registry.
//!
//! Every rejection leaves registry state untouched. Only an unauthorized
//! `register` or `remove` is accompanied by an `Error` audit event.

use shared_types::{format_address, Address, AddressError, Role};
use thiserror::Error;

/// Rejections returned by registry mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Property identifier is the reserved zero value.
    #[error("Property identifier must be non-zero")]
    ZeroProperty,

    /// Proposed controller is the reserved zero value.
    #[error("Controller address must be non-zero")]
    ZeroController,

    /// Caller does not hold the role the operation requires.
    #[error("Unauthorized caller {}: {required} role required", format_address(.caller))]
    Unauthorized {
        /// Rejected caller.
        caller: Address,
        /// Role the operation requires.
        required: Role,
    },
}

impl RegistryError {
    /// Whether this rejection is recorded in the event log.
    ///
    /// Controller-gated operations audit unauthorized callers; the
    /// owner-gated `set_controller` does not.
    pub fn is_audited(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized {
                required: Role::Controller,
                ..
            }
        )
    }

    /// Whether the rejection was caused by a zero-address argument.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::ZeroProperty | Self::ZeroController)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// A setting holds the zero address where a real identity is needed.
    #[error("Setting {0} must be a non-zero address")]
    ZeroAddress(&'static str),

    /// A setting could not be parsed as an address.
    #[error("Setting {field} is not a valid address: {source}")]
    InvalidAddress {
        field: &'static str,
        #[source]
        source: AddressError,
    },
}
