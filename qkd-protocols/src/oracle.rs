//! Boundary to the quantum channel.
//!
//! The protocols treat circuit execution as an opaque capability: hand
//! over a circuit description, get back one sampled outcome or a shot
//! histogram. The engine never looks inside the channel; swapping the
//! bundled state-vector simulator for another backend only requires this
//! trait.

use qubit_sim::circuit::Circuit;
use qubit_sim::error::SimError;
use qubit_sim::outcome::{Histogram, Outcome};
use qubit_sim::simulator::Simulator;
use rand::Rng;

/// Executes circuit descriptions on behalf of the protocols.
///
/// Implementations must be stateless per call (or internally pooled):
/// concurrent requests share one oracle value.
pub trait ChannelOracle {
    /// Execute the circuit once and return the sampled outcome.
    fn sample<R: Rng>(&self, circuit: &Circuit, rng: &mut R) -> Result<Outcome, SimError>;

    /// Execute `shots` independent samples of the circuit and return the
    /// outcome frequency histogram.
    fn histogram<R: Rng>(
        &self,
        circuit: &Circuit,
        shots: u32,
        rng: &mut R,
    ) -> Result<Histogram, SimError>;
}

impl ChannelOracle for Simulator {
    fn sample<R: Rng>(&self, circuit: &Circuit, rng: &mut R) -> Result<Outcome, SimError> {
        Simulator::sample(self, circuit, rng)
    }

    fn histogram<R: Rng>(
        &self,
        circuit: &Circuit,
        shots: u32,
        rng: &mut R,
    ) -> Result<Histogram, SimError> {
        Simulator::histogram(self, circuit, shots, rng)
    }
}
