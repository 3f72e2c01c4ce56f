//! Entangled-pair pairing/grouping protocol.
//!
//! Each round runs a prepare/reverse/verify state machine over four
//! qubits. Alice partitions the qubits into two pairs and entangles them
//! into the Bell-state combination named by her group code; Bob, without
//! seeing her choices, stacks the reverse circuit of his own guessed
//! pairing and code on top. The channel then samples the combined circuit
//! with a full measurement: only an exact inversion leaves every shot at
//! the all-zero pattern, and an exact inversion requires Bob's pairing
//! and grouping to equal Alice's. A confirmed round therefore lets both
//! parties take the two bits of their own group code with no bit
//! exchange.

use log::debug;
use qubit_sim::circuit::Circuit;
use rand::Rng;

use crate::choices::{GroupCode, Pairing};
use crate::engine::{EngineConfig, KeyProtocol, SiftedBits};
use crate::error::KeyGenError;
use crate::oracle::ChannelOracle;
use crate::party::Party;

/// Qubits per round: two entangled pairs.
const ROUND_QUBITS: usize = 4;

/// Entangled-pair protocol runner.
#[derive(Debug, Clone)]
pub struct PairingProtocol {
    rounds_per_batch: usize,
    verification_passes: usize,
    verification_shots: u32,
}

impl PairingProtocol {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rounds_per_batch: config.batch_rounds,
            // At least one pass, or no round could ever be confirmed.
            verification_passes: config.verification_passes.max(1),
            verification_shots: config.verification_shots,
        }
    }

    /// Build one round's combined circuit: Alice's preparation followed by
    /// Bob's reversal and a full measurement.
    pub fn round_circuit(
        alice: (Pairing, GroupCode),
        bob: (Pairing, GroupCode),
    ) -> Circuit {
        let mut c = Circuit::new(ROUND_QUBITS, ROUND_QUBITS);

        let (pairing, group) = alice;
        let [first, second] = pairing.pairs();
        let (state_a, state_b) = group.states();
        state_a.prepare(&mut c, first);
        state_b.prepare(&mut c, second);

        let (pairing, group) = bob;
        let [first, second] = pairing.pairs();
        let (state_a, state_b) = group.states();
        state_a.reverse(&mut c, first);
        state_b.reverse(&mut c, second);

        c.measure_all();
        c
    }

    /// One verification pass over the batch; returns the confirmed round
    /// indices.
    fn verify_batch<O, R>(
        &self,
        alice: &Party,
        bob: &Party,
        oracle: &O,
        rng: &mut R,
    ) -> Result<Vec<usize>, KeyGenError>
    where
        O: ChannelOracle,
        R: Rng,
    {
        let mut confirmed = Vec::new();
        for round in 0..alice.rounds() {
            let circuit = Self::round_circuit(
                (alice.pairings[round], alice.groupings[round]),
                (bob.pairings[round], bob.groupings[round]),
            );
            let histogram = oracle.histogram(&circuit, self.verification_shots, rng)?;
            if histogram.collapsed_to_zero() {
                debug!("round {round}: guess confirmed");
                confirmed.push(round);
            }
        }
        Ok(confirmed)
    }
}

impl KeyProtocol for PairingProtocol {
    fn label(&self) -> &'static str {
        "BS"
    }

    fn run_batch<O: ChannelOracle, R: Rng>(
        &self,
        oracle: &O,
        rng: &mut R,
    ) -> Result<SiftedBits, KeyGenError> {
        let mut alice = Party::draw(self.rounds_per_batch, rng);
        let mut bob = Party::draw(self.rounds_per_batch, rng);

        // The batch goes through verification more than once before its
        // code is taken; the final pass's confirmation set wins.
        let mut confirmed = Vec::new();
        for _ in 0..self.verification_passes {
            confirmed = self.verify_batch(&alice, &bob, oracle, rng)?;
        }

        alice.confirmed.clone_from(&confirmed);
        bob.confirmed = confirmed;
        alice.fold_confirmed();
        bob.fold_confirmed();

        Ok(SiftedBits {
            alice: alice.fragment,
            bob: bob.fragment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qubit_sim::simulator::Simulator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn protocol() -> PairingProtocol {
        PairingProtocol::new(&EngineConfig::default())
    }

    #[test]
    fn matching_guess_always_verifies() {
        let sim = Simulator::new();
        let mut rng = StdRng::seed_from_u64(21);
        for pairing in Pairing::ALL {
            for group in GroupCode::ALL {
                let circuit =
                    PairingProtocol::round_circuit((pairing, group), (pairing, group));
                let hist = sim.histogram(&circuit, 256, &mut rng).unwrap();
                assert!(
                    hist.collapsed_to_zero(),
                    "{pairing:?}/{group:?} must invert itself"
                );
            }
        }
    }

    #[test]
    fn wrong_group_guess_never_verifies() {
        let sim = Simulator::new();
        let mut rng = StdRng::seed_from_u64(21);
        for pairing in Pairing::ALL {
            for alice_group in GroupCode::ALL {
                for bob_group in GroupCode::ALL {
                    if alice_group == bob_group {
                        continue;
                    }
                    let circuit = PairingProtocol::round_circuit(
                        (pairing, alice_group),
                        (pairing, bob_group),
                    );
                    let hist = sim.histogram(&circuit, 256, &mut rng).unwrap();
                    assert!(
                        !hist.collapsed_to_zero(),
                        "{alice_group:?} reversed as {bob_group:?} should fail"
                    );
                }
            }
        }
    }

    #[test]
    fn batch_fragments_agree_and_pair_with_confirmed_rounds() {
        let sim = Simulator::new();
        let mut rng = StdRng::seed_from_u64(21);
        let protocol = protocol();
        for _ in 0..5 {
            let sifted = protocol.run_batch(&sim, &mut rng).unwrap();
            assert_eq!(
                sifted.alice, sifted.bob,
                "confirmed rounds must yield identical fragments"
            );
            assert_eq!(
                sifted.alice.len() % 2,
                0,
                "every confirmed round contributes exactly two bits"
            );
        }
    }

    #[test]
    fn confirmed_rounds_mean_equal_private_choices() {
        // Drive the verification path directly: rounds confirmed by the
        // channel must be exactly those where Bob guessed Alice's pairing
        // and grouping.
        let sim = Simulator::new();
        let mut rng = StdRng::seed_from_u64(33);
        let protocol = protocol();
        let alice = Party::draw(20, &mut rng);
        let bob = Party::draw(20, &mut rng);
        let confirmed = protocol.verify_batch(&alice, &bob, &sim, &mut rng).unwrap();
        for round in 0..20 {
            let guessed = alice.pairings[round] == bob.pairings[round]
                && alice.groupings[round] == bob.groupings[round];
            assert_eq!(
                confirmed.contains(&round),
                guessed,
                "round {round}: confirmation must track guess equality"
            );
        }
    }
}
