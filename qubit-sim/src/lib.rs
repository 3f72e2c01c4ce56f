//! # qubit-sim
//!
//! Compact gate-level quantum circuit simulator.
//!
//! A circuit is an ordered list of gate and measurement ops over a fixed
//! qubit register. Execution keeps the full 2^n state vector, so the crate
//! is meant for the small circuits of protocol simulation (a handful of
//! qubits), not for general-purpose workloads.
//!
//! ## Execution model
//!
//! - Gates are applied in op order to the state vector.
//! - Measurements are terminal: each shot samples one computational-basis
//!   outcome from the final state and maps measured qubits onto classical
//!   bits. Shots are independent, as if the circuit were re-prepared.
//! - All randomness is drawn from a caller-supplied [`rand::Rng`], so a
//!   seeded generator reproduces a run exactly.

pub mod circuit;
pub mod error;
pub mod outcome;
pub mod simulator;
pub mod state;

pub mod prelude {
    pub use crate::circuit::*;
    pub use crate::error::*;
    pub use crate::outcome::*;
    pub use crate::simulator::*;
    pub use crate::state::*;
}
