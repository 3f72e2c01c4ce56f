//! Error taxonomy for key generation.
//!
//! Every error is local to one request; there is no cross-request error
//! state to reset.

use qubit_sim::error::SimError;
use thiserror::Error;

/// Errors surfaced by the key-generation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyGenError {
    /// The requested key length was not a positive integer.
    #[error("desired key length must be positive")]
    InvalidLength,

    /// The quantum channel failed to execute a circuit.
    #[error("quantum channel failure: {0}")]
    Channel(#[from] SimError),

    /// The batching loop hit its cap before accumulating enough bits.
    #[error("key did not reach the requested length within {batches} batches")]
    DeadlineExceeded { batches: usize },
}
