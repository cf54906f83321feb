//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound `EventLog` port.

mod bus_event_log;
mod recording_log;

pub use bus_event_log::BusEventLog;
pub use recording_log::InMemoryEventLog;
