//! # Error Types
//!
//! Defines error types used across crates.

use thiserror::Error;

/// Errors raised while parsing an address from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Wrong number of hex digits.
    #[error("Invalid address length: expected {expected} hex digits, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// Input is not valid hexadecimal.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}
