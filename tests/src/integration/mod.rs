//! # Integration Tests
//!
//! The property registry wired to the shared event bus.

pub mod registry_flows;
