//! Typed per-party state for the entangled-pair protocol.

use rand::Rng;

use crate::bits::BitString;
use crate::choices::{GroupCode, Pairing};

/// One endpoint of the protocol (Alice or Bob) over a single batch.
///
/// Holds the party's private per-round choices, the round indices the
/// channel confirmed, and the key bits folded out of them. Only the
/// protocol that owns the batch mutates a party; the parties never see
/// each other's choices except through the channel's verification result,
/// which stands in for the public announcement step of real QKD.
#[derive(Debug, Clone)]
pub struct Party {
    /// Per-round qubit pairing choice.
    pub pairings: Vec<Pairing>,
    /// Per-round Bell-group choice.
    pub groupings: Vec<GroupCode>,
    /// Round indices confirmed correct by the channel.
    pub confirmed: Vec<usize>,
    /// Key bits accumulated from confirmed rounds.
    pub fragment: BitString,
}

impl Party {
    /// Draw a batch of independent uniform choices.
    pub fn draw<R: Rng>(rounds: usize, rng: &mut R) -> Self {
        Self {
            pairings: (0..rounds).map(|_| Pairing::random(rng)).collect(),
            groupings: (0..rounds).map(|_| GroupCode::random(rng)).collect(),
            confirmed: Vec::new(),
            fragment: BitString::new(),
        }
    }

    /// Number of rounds in the batch.
    pub fn rounds(&self) -> usize {
        self.pairings.len()
    }

    /// Fold the confirmed rounds' grouping bits into the key fragment.
    pub fn fold_confirmed(&mut self) {
        for &round in &self.confirmed {
            for bit in self.groupings[round].bits() {
                self.fragment.push(bit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn draw_produces_one_choice_pair_per_round() {
        let mut rng = StdRng::seed_from_u64(3);
        let party = Party::draw(10, &mut rng);
        assert_eq!(party.rounds(), 10);
        assert_eq!(party.groupings.len(), 10);
        assert!(party.confirmed.is_empty());
        assert!(party.fragment.is_empty());
    }

    #[test]
    fn fold_confirmed_takes_two_bits_per_round() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut party = Party::draw(5, &mut rng);
        party.confirmed = vec![0, 3];
        party.fold_confirmed();
        assert_eq!(party.fragment.len(), 4);
        let expected: Vec<bool> = party.groupings[0]
            .bits()
            .into_iter()
            .chain(party.groupings[3].bits())
            .collect();
        assert_eq!(party.fragment.as_bits(), &expected[..]);
    }
}
