//! Per-round structural choices for each party.
//!
//! Every choice is drawn uniformly over its domain, and each party draws
//! independently; nothing here derives one party's choice from the
//! other's. A party's choices stay private until the sifting step
//! compares them through the channel's verification result.

use qubit_sim::circuit::Circuit;
use rand::Rng;

/// One of the three partitions of qubits {0,1,2,3} into two ordered pairs.
///
/// Within each pair the first qubit is the control candidate of the
/// entangling CNOT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Pairs (0,1) and (2,3).
    Adjacent,
    /// Pairs (0,2) and (1,3).
    Interleaved,
    /// Pairs (0,3) and (1,2).
    Crossed,
}

impl Pairing {
    pub const ALL: [Pairing; 3] = [Pairing::Adjacent, Pairing::Interleaved, Pairing::Crossed];

    /// The two ordered qubit pairs of the partition.
    pub fn pairs(self) -> [(usize, usize); 2] {
        match self {
            Pairing::Adjacent => [(0, 1), (2, 3)],
            Pairing::Interleaved => [(0, 2), (1, 3)],
            Pairing::Crossed => [(0, 3), (1, 2)],
        }
    }

    /// Uniform draw over the three partitions.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Bell-state variant of a single entangled qubit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BellState {
    PhiPlus,
    PhiMinus,
    PsiPlus,
    PsiMinus,
}

impl BellState {
    /// Entangle `pair` into this Bell state on top of |00>.
    pub fn prepare(self, c: &mut Circuit, pair: (usize, usize)) {
        let (a, b) = pair;
        match self {
            BellState::PhiPlus => {
                c.h(a).cx(a, b);
            }
            BellState::PhiMinus => {
                c.x(a).h(a).cx(a, b);
            }
            BellState::PsiPlus => {
                c.h(a).x(b).cx(a, b);
            }
            BellState::PsiMinus => {
                c.h(a).x(b).z(a).z(b).cx(a, b);
            }
        }
    }

    /// The algebraic inverse of [`BellState::prepare`]: applied on top of
    /// the matching prepared state it returns the pair to |00>.
    pub fn reverse(self, c: &mut Circuit, pair: (usize, usize)) {
        let (a, b) = pair;
        match self {
            BellState::PhiPlus => {
                c.cx(a, b).h(a);
            }
            BellState::PhiMinus => {
                c.cx(a, b).h(a).x(a);
            }
            BellState::PsiPlus => {
                c.cx(a, b).x(b).h(a);
            }
            BellState::PsiMinus => {
                c.cx(a, b).z(b).z(a).x(b).h(a);
            }
        }
    }
}

/// Two-pair Bell-state combination chosen by a party for one round.
///
/// A confirmed round contributes the code's two bits to the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCode {
    G00,
    G01,
    G10,
    G11,
}

impl GroupCode {
    pub const ALL: [GroupCode; 4] =
        [GroupCode::G00, GroupCode::G01, GroupCode::G10, GroupCode::G11];

    /// Bell variants applied to the partition's first and second pair.
    pub fn states(self) -> (BellState, BellState) {
        match self {
            GroupCode::G00 => (BellState::PhiPlus, BellState::PhiMinus),
            GroupCode::G01 => (BellState::PhiMinus, BellState::PhiPlus),
            GroupCode::G10 => (BellState::PsiPlus, BellState::PsiMinus),
            GroupCode::G11 => (BellState::PsiMinus, BellState::PsiPlus),
        }
    }

    /// The code's key contribution, most significant bit first.
    pub fn bits(self) -> [bool; 2] {
        match self {
            GroupCode::G00 => [false, false],
            GroupCode::G01 => [false, true],
            GroupCode::G10 => [true, false],
            GroupCode::G11 => [true, true],
        }
    }

    /// Uniform draw over the four codes.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// BB84 measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    Rectilinear,
    Diagonal,
}

impl Basis {
    pub fn is_diagonal(self) -> bool {
        self == Basis::Diagonal
    }

    /// Uniform draw over the two bases.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen() {
            Basis::Diagonal
        } else {
            Basis::Rectilinear
        }
    }
}

/// Alice's E91 measurement setting (directions a1..a3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliceSetting {
    /// a1: X direction.
    X,
    /// a2: W direction, the (x+z)/sqrt(2) diagonal.
    W,
    /// a3: Z direction (computational basis).
    Z,
}

impl AliceSetting {
    pub const ALL: [AliceSetting; 3] = [AliceSetting::X, AliceSetting::W, AliceSetting::Z];

    /// Rotate `qubit` so a computational-basis measurement reads out this
    /// direction's spin projection.
    pub fn apply(self, c: &mut Circuit, qubit: usize) {
        match self {
            AliceSetting::X => {
                c.h(qubit);
            }
            AliceSetting::W => {
                c.s(qubit).h(qubit).t(qubit).h(qubit);
            }
            AliceSetting::Z => {}
        }
    }

    /// Uniform draw over the three settings.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Bob's E91 measurement setting (directions b1..b3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BobSetting {
    /// b1: W direction.
    W,
    /// b2: Z direction (computational basis).
    Z,
    /// b3: V direction, the (z-x)/sqrt(2) diagonal.
    V,
}

impl BobSetting {
    pub const ALL: [BobSetting; 3] = [BobSetting::W, BobSetting::Z, BobSetting::V];

    /// Rotate `qubit` so a computational-basis measurement reads out this
    /// direction's spin projection.
    pub fn apply(self, c: &mut Circuit, qubit: usize) {
        match self {
            BobSetting::W => {
                c.s(qubit).h(qubit).t(qubit).h(qubit);
            }
            BobSetting::Z => {}
            BobSetting::V => {
                c.s(qubit).h(qubit).tdg(qubit).h(qubit);
            }
        }
    }

    /// Uniform draw over the three settings.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qubit_sim::simulator::Simulator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pairings_partition_all_four_qubits() {
        for pairing in Pairing::ALL {
            let [(a, b), (c, d)] = pairing.pairs();
            let mut seen = [a, b, c, d];
            seen.sort_unstable();
            assert_eq!(seen, [0, 1, 2, 3], "{pairing:?} must cover every qubit once");
        }
    }

    #[test]
    fn every_bell_state_reverses_to_zero() {
        let sim = Simulator::new();
        let mut rng = StdRng::seed_from_u64(11);
        for state in [
            BellState::PhiPlus,
            BellState::PhiMinus,
            BellState::PsiPlus,
            BellState::PsiMinus,
        ] {
            let mut c = Circuit::new(2, 2);
            state.prepare(&mut c, (0, 1));
            state.reverse(&mut c, (0, 1));
            c.measure_all();
            let hist = sim.histogram(&c, 128, &mut rng).unwrap();
            assert!(
                hist.collapsed_to_zero(),
                "{state:?} reverse must undo prepare"
            );
        }
    }

    #[test]
    fn mismatched_bell_reverse_never_collapses_to_zero() {
        let sim = Simulator::new();
        let mut rng = StdRng::seed_from_u64(11);
        for prepare in [BellState::PhiPlus, BellState::PsiMinus] {
            for reverse in [BellState::PhiMinus, BellState::PsiPlus] {
                let mut c = Circuit::new(2, 2);
                prepare.prepare(&mut c, (0, 1));
                reverse.reverse(&mut c, (0, 1));
                c.measure_all();
                let hist = sim.histogram(&c, 128, &mut rng).unwrap();
                assert!(
                    !hist.collapsed_to_zero(),
                    "{prepare:?} undone by {reverse:?} should not verify"
                );
            }
        }
    }

    #[test]
    fn random_draws_cover_each_domain() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pairings = [0usize; 3];
        let mut groups = [0usize; 4];
        for _ in 0..400 {
            pairings[Pairing::random(&mut rng) as usize] += 1;
            groups[GroupCode::random(&mut rng) as usize] += 1;
        }
        assert!(pairings.iter().all(|&n| n > 0), "every pairing must appear");
        assert!(groups.iter().all(|&n| n > 0), "every group code must appear");
    }

    #[test]
    fn group_codes_enumerate_two_bit_patterns() {
        let patterns: Vec<[bool; 2]> = GroupCode::ALL.iter().map(|g| g.bits()).collect();
        assert_eq!(
            patterns,
            vec![
                [false, false],
                [false, true],
                [true, false],
                [true, true],
            ]
        );
    }
}
