//! Error types for the zone culling engine
//!
//! This module defines the recoverable error types used throughout the crate:
//! lifecycle of culling systems, configuration, and the engine registry.
//!
//! Programming errors (capacity overflow, out-of-range indices) are NOT
//! represented here. They are fatal and reported through `engine_fatal!`.

use std::fmt;

/// Result type for zone culling operations
pub type Result<T> = std::result::Result<T, Error>;

/// Zone culling errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Visibility oracle backend error
    BackendError(String),

    /// Invalid configuration (bands, distances, capacity)
    InvalidConfig(String),

    /// Initialization failed (engine, culling system, oracle)
    InitializationFailed(String),

    /// Named culling system not found
    NotFound(String),

    /// A shared lock was poisoned by a panicking holder
    LockPoisoned(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::LockPoisoned(msg) => write!(f, "Lock poisoned: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
