//! # Domain Module
//!
//! Core domain types for the property registry: state aggregate,
//! invariants, errors and configuration. No I/O.

pub mod config;
pub mod entities;
pub mod errors;
pub mod invariants;

pub use config::RegistryConfig;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
