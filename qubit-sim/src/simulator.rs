//! Circuit execution: apply the unitary prefix, then sample measured
//! qubits.
//!
//! Measurement ops are collected while the gates run and resolved per
//! shot: each shot draws one basis state from the final amplitudes and
//! copies the measured qubits into the classical register. The state is
//! never collapsed between shots, which matches a channel that re-prepares
//! the circuit for every sample.

use rand::Rng;

use crate::circuit::{Circuit, Op};
use crate::error::SimError;
use crate::outcome::{Histogram, Outcome};
use crate::state::StateVector;

/// Stateless circuit executor. Cheap to copy and safe to share between
/// concurrent requests; every call threads its own rng.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulator;

impl Simulator {
    pub fn new() -> Self {
        Self
    }

    fn prepare(&self, circuit: &Circuit) -> Result<(StateVector, Vec<(usize, usize)>), SimError> {
        let mut state = StateVector::zero_state(circuit.num_qubits())?;
        let mut measures = Vec::new();
        for &op in circuit.ops() {
            if let Op::Measure { qubit, clbit } = op {
                if qubit >= circuit.num_qubits() {
                    return Err(SimError::QubitOutOfRange {
                        qubit,
                        width: circuit.num_qubits(),
                    });
                }
                if clbit >= circuit.num_clbits() {
                    return Err(SimError::ClbitOutOfRange {
                        clbit,
                        width: circuit.num_clbits(),
                    });
                }
                measures.push((qubit, clbit));
            } else {
                state.apply(op)?;
            }
        }
        if measures.is_empty() {
            return Err(SimError::NoMeasurements);
        }
        Ok((state, measures))
    }

    fn shot<R: Rng>(
        &self,
        state: &StateVector,
        measures: &[(usize, usize)],
        num_clbits: usize,
        rng: &mut R,
    ) -> Outcome {
        let basis = state.sample_basis(rng);
        let mut bits = vec![false; num_clbits];
        for &(qubit, clbit) in measures {
            bits[clbit] = (basis >> qubit) & 1 == 1;
        }
        Outcome::new(bits)
    }

    /// Execute the circuit with a single shot and return its outcome.
    pub fn sample<R: Rng>(&self, circuit: &Circuit, rng: &mut R) -> Result<Outcome, SimError> {
        let (state, measures) = self.prepare(circuit)?;
        Ok(self.shot(&state, &measures, circuit.num_clbits(), rng))
    }

    /// Execute `shots` independent shots of the circuit and return the
    /// outcome frequency histogram.
    pub fn histogram<R: Rng>(
        &self,
        circuit: &Circuit,
        shots: u32,
        rng: &mut R,
    ) -> Result<Histogram, SimError> {
        let (state, measures) = self.prepare(circuit)?;
        let mut histogram = Histogram::new();
        for _ in 0..shots {
            histogram.record(self.shot(&state, &measures, circuit.num_clbits(), rng));
        }
        Ok(histogram)
    }
}
