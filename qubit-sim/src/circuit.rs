//! Circuit description consumed by the simulator.
//!
//! The gate set is the minimum the QKD protocols need: Hadamard, the Pauli
//! X and Z, the S/T phase family with their inverses, CNOT, and projective
//! measurement. Builder methods only record ops; index validation happens
//! at execution time so a malformed circuit surfaces as an error, not a
//! panic.

/// A single operation in a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Hadamard gate.
    H(usize),
    /// Pauli X (bit flip).
    X(usize),
    /// Pauli Z (phase flip).
    Z(usize),
    /// Phase gate (sqrt of Z).
    S(usize),
    /// Inverse phase gate.
    Sdg(usize),
    /// T gate (sqrt of S).
    T(usize),
    /// Inverse T gate.
    Tdg(usize),
    /// Controlled-X.
    Cx { control: usize, target: usize },
    /// Projective measurement of `qubit` into classical bit `clbit`.
    Measure { qubit: usize, clbit: usize },
}

/// An ordered op list over fixed qubit and classical registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    ops: Vec<Op>,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits and `num_clbits`
    /// classical bits.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            num_qubits,
            num_clbits,
            ops: Vec::new(),
        }
    }

    /// Width of the qubit register.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Width of the classical register.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// The recorded ops, in application order.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Append an op.
    pub fn push(&mut self, op: Op) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// Append a Hadamard on `qubit`.
    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.push(Op::H(qubit))
    }

    /// Append a Pauli X on `qubit`.
    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.push(Op::X(qubit))
    }

    /// Append a Pauli Z on `qubit`.
    pub fn z(&mut self, qubit: usize) -> &mut Self {
        self.push(Op::Z(qubit))
    }

    /// Append an S gate on `qubit`.
    pub fn s(&mut self, qubit: usize) -> &mut Self {
        self.push(Op::S(qubit))
    }

    /// Append an inverse S gate on `qubit`.
    pub fn sdg(&mut self, qubit: usize) -> &mut Self {
        self.push(Op::Sdg(qubit))
    }

    /// Append a T gate on `qubit`.
    pub fn t(&mut self, qubit: usize) -> &mut Self {
        self.push(Op::T(qubit))
    }

    /// Append an inverse T gate on `qubit`.
    pub fn tdg(&mut self, qubit: usize) -> &mut Self {
        self.push(Op::Tdg(qubit))
    }

    /// Append a CNOT with the given control and target.
    pub fn cx(&mut self, control: usize, target: usize) -> &mut Self {
        self.push(Op::Cx { control, target })
    }

    /// Append a measurement of `qubit` into `clbit`.
    pub fn measure(&mut self, qubit: usize, clbit: usize) -> &mut Self {
        self.push(Op::Measure { qubit, clbit })
    }

    /// Measure every qubit i into classical bit i.
    ///
    /// Requires the classical register to be at least as wide as the qubit
    /// register; checked at execution time.
    pub fn measure_all(&mut self) -> &mut Self {
        for i in 0..self.num_qubits {
            self.measure(i, i);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_records_ops_in_order() {
        let mut c = Circuit::new(2, 2);
        c.h(0).cx(0, 1).measure(1, 0);
        assert_eq!(
            c.ops(),
            &[
                Op::H(0),
                Op::Cx { control: 0, target: 1 },
                Op::Measure { qubit: 1, clbit: 0 },
            ]
        );
    }

    #[test]
    fn measure_all_maps_identically() {
        let mut c = Circuit::new(3, 3);
        c.measure_all();
        for (i, op) in c.ops().iter().enumerate() {
            assert_eq!(*op, Op::Measure { qubit: i, clbit: i });
        }
    }
}
