//! BB84 basis-encode/measure protocol.
//!
//! Alice encodes each bit into a qubit: a bit flip when the bit is one,
//! then a Hadamard when her basis is diagonal. Bob rotates back with his
//! own independently drawn basis before measuring. One shot runs the
//! whole batch circuit; sifting keeps the measured bit at every index
//! where the two basis draws agree.
//!
//! Simplification relative to textbook BB84: both keys are the same
//! filtered oracle bits rather than Bob measuring a transmitted qubit and
//! the parties comparing a public subset, so agreement is by
//! construction.

use qubit_sim::circuit::Circuit;
use qubit_sim::outcome::Outcome;
use rand::Rng;

use crate::bits::BitString;
use crate::choices::Basis;
use crate::engine::{EngineConfig, KeyProtocol, SiftedBits};
use crate::error::KeyGenError;
use crate::oracle::ChannelOracle;

/// BB84 protocol runner.
#[derive(Debug, Clone)]
pub struct Bb84Protocol {
    qubits_per_batch: usize,
}

impl Bb84Protocol {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            qubits_per_batch: config.batch_rounds,
        }
    }

    /// Build the batch circuit from Alice's bits and both parties' bases.
    pub fn batch_circuit(
        alice_bits: &[bool],
        alice_bases: &[Basis],
        bob_bases: &[Basis],
    ) -> Circuit {
        let n = alice_bits.len();
        let mut c = Circuit::new(n, n);
        for i in 0..n {
            if alice_bits[i] {
                c.x(i);
            }
            if alice_bases[i].is_diagonal() {
                c.h(i);
            }
        }
        for i in 0..n {
            if bob_bases[i].is_diagonal() {
                c.h(i);
            }
            c.measure(i, i);
        }
        c
    }

    /// Keep the measured bit at every index where the bases agree.
    pub fn sift(alice_bases: &[Basis], bob_bases: &[Basis], outcome: &Outcome) -> SiftedBits {
        let mut alice = BitString::new();
        let mut bob = BitString::new();
        for i in 0..alice_bases.len() {
            if alice_bases[i] == bob_bases[i] {
                let bit = outcome.bit(i);
                alice.push(bit);
                bob.push(bit);
            }
        }
        SiftedBits { alice, bob }
    }
}

impl KeyProtocol for Bb84Protocol {
    fn label(&self) -> &'static str {
        "BB84"
    }

    fn run_batch<O: ChannelOracle, R: Rng>(
        &self,
        oracle: &O,
        rng: &mut R,
    ) -> Result<SiftedBits, KeyGenError> {
        let n = self.qubits_per_batch;
        let alice_bits: Vec<bool> = (0..n).map(|_| rng.gen()).collect();
        let alice_bases: Vec<Basis> = (0..n).map(|_| Basis::random(rng)).collect();
        let bob_bases: Vec<Basis> = (0..n).map(|_| Basis::random(rng)).collect();

        let circuit = Self::batch_circuit(&alice_bits, &alice_bases, &bob_bases);
        let outcome = oracle.sample(&circuit, rng)?;
        Ok(Self::sift(&alice_bases, &bob_bases, &outcome))
    }
}
