//! Error types.

use crate::config::ConfigError;
use crate::measurement::CounterError;
use crate::session::Phase;

/// Errors surfaced by a sampling session.
///
/// None of these are retried: each one ends the session.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The workload checksum did not match the expected value.
    #[error("Checksum {actual} != {expected}")]
    ChecksumMismatch {
        /// Checksum reported by the workload.
        actual: i32,
        /// Checksum the caller required.
        expected: i32,
    },

    /// A session method was called out of order.
    #[error("session is {actual}, cannot {operation}")]
    InvalidPhase {
        /// What the caller tried to do.
        operation: &'static str,
        /// Phase the session was in.
        actual: Phase,
    },

    /// Rejected configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Cycle source could not be created.
    #[error(transparent)]
    Counter(#[from] CounterError),
}

/// Result alias for sampling operations.
pub type Result<T> = std::result::Result<T, BenchError>;
