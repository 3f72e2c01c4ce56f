//! Error types for circuit execution.

use thiserror::Error;

/// Errors raised while executing a circuit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A gate or measurement referenced a qubit outside the register.
    #[error("qubit index {qubit} out of range for {width}-qubit circuit")]
    QubitOutOfRange { qubit: usize, width: usize },

    /// A measurement referenced a classical bit outside the register.
    #[error("classical bit {clbit} out of range for {width}-bit register")]
    ClbitOutOfRange { clbit: usize, width: usize },

    /// The circuit is wider than a state vector can reasonably hold.
    #[error("{width} qubits exceed the supported maximum of {max}")]
    TooManyQubits { width: usize, max: usize },

    /// A controlled gate used the same qubit as control and target.
    #[error("controlled gate with identical control and target {0}")]
    DegenerateControl(usize),

    /// The circuit contains no measurement ops to sample.
    #[error("circuit has no measurements to sample")]
    NoMeasurements,
}
