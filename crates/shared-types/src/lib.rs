//! # Shared Types Crate
//!
//! Identity primitives shared by the property registry and the event log.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Address`, `PropertyId` and `Role` are
//!   defined here and nowhere else.
//! - **Zero is reserved**: `ZERO_ADDRESS` never names a property or a role
//!   holder.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
