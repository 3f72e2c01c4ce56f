//! State-vector representation and gate application.
//!
//! Amplitudes are indexed little-endian: bit i of a basis-state index is
//! the value of qubit i. A single-qubit gate therefore touches amplitude
//! pairs that differ only in bit i; CNOT swaps amplitudes whose control
//! bit is set and differ in the target bit.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use num_complex::Complex64;
use num_traits::{One, Zero};
use rand::Rng;

use crate::circuit::Op;
use crate::error::SimError;

/// Widest register the simulator accepts. 2^16 amplitudes is already far
/// beyond what the protocol circuits use, but keeps a typo from allocating
/// the machine away.
pub const MAX_QUBITS: usize = 16;

type Mat2 = [[Complex64; 2]; 2];

fn hadamard() -> Mat2 {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn pauli_x() -> Mat2 {
    let zero = Complex64::zero();
    let one = Complex64::one();
    [[zero, one], [one, zero]]
}

/// Diagonal phase gate diag(1, p). Exact constants are used for Z and S so
/// that inverse circuits cancel to working precision.
fn phase(p: Complex64) -> Mat2 {
    let zero = Complex64::zero();
    [[Complex64::one(), zero], [zero, p]]
}

/// Full complex amplitude vector over a small qubit register.
#[derive(Debug, Clone)]
pub struct StateVector {
    width: usize,
    amps: Vec<Complex64>,
}

impl StateVector {
    /// The all-zero computational basis state |0...0>.
    pub fn zero_state(width: usize) -> Result<Self, SimError> {
        if width > MAX_QUBITS {
            return Err(SimError::TooManyQubits {
                width,
                max: MAX_QUBITS,
            });
        }
        let mut amps = vec![Complex64::zero(); 1 << width];
        amps[0] = Complex64::one();
        Ok(Self { width, amps })
    }

    /// Register width in qubits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raw amplitudes (read-only), indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amps
    }

    fn check_qubit(&self, qubit: usize) -> Result<(), SimError> {
        if qubit >= self.width {
            return Err(SimError::QubitOutOfRange {
                qubit,
                width: self.width,
            });
        }
        Ok(())
    }

    /// Apply a unitary op in place. Measurement ops are rejected here;
    /// the simulator handles them when sampling.
    pub fn apply(&mut self, op: Op) -> Result<(), SimError> {
        match op {
            Op::H(q) => self.apply_single(q, hadamard()),
            Op::X(q) => self.apply_single(q, pauli_x()),
            Op::Z(q) => self.apply_single(q, phase(Complex64::new(-1.0, 0.0))),
            Op::S(q) => self.apply_single(q, phase(Complex64::new(0.0, 1.0))),
            Op::Sdg(q) => self.apply_single(q, phase(Complex64::new(0.0, -1.0))),
            Op::T(q) => self.apply_single(q, phase(Complex64::from_polar(1.0, FRAC_PI_4))),
            Op::Tdg(q) => self.apply_single(q, phase(Complex64::from_polar(1.0, -FRAC_PI_4))),
            Op::Cx { control, target } => self.apply_cx(control, target),
            Op::Measure { qubit, .. } => self.check_qubit(qubit),
        }
    }

    fn apply_single(&mut self, qubit: usize, m: Mat2) -> Result<(), SimError> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        for idx in 0..self.amps.len() {
            if idx & mask == 0 {
                let paired = idx | mask;
                let a0 = self.amps[idx];
                let a1 = self.amps[paired];
                self.amps[idx] = m[0][0] * a0 + m[0][1] * a1;
                self.amps[paired] = m[1][0] * a0 + m[1][1] * a1;
            }
        }
        Ok(())
    }

    fn apply_cx(&mut self, control: usize, target: usize) -> Result<(), SimError> {
        self.check_qubit(control)?;
        self.check_qubit(target)?;
        if control == target {
            return Err(SimError::DegenerateControl(control));
        }
        let cmask = 1usize << control;
        let tmask = 1usize << target;
        for idx in 0..self.amps.len() {
            if idx & cmask != 0 && idx & tmask == 0 {
                self.amps.swap(idx, idx | tmask);
            }
        }
        Ok(())
    }

    /// Sample one computational-basis index from the amplitude
    /// distribution.
    pub fn sample_basis<R: Rng>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.gen();
        let mut acc = 0.0;
        for (idx, amp) in self.amps.iter().enumerate() {
            acc += amp.norm_sqr();
            if r < acc {
                return idx;
            }
        }
        // Floating-point round-off can leave acc fractionally below 1.
        self.amps.len() - 1
    }
}
