//! Sifting and key-assembly orchestrator.
//!
//! The shared control loop behind every endpoint: run protocol batches,
//! concatenate the accepted bits, and stop once the accumulated fragment
//! length exceeds the requested key length, truncating both parties'
//! fragments to exactly that length.
//!
//! Convergence is probabilistic, so the loop is bounded: a protocol that
//! stops yielding bits surfaces a deadline error after `max_batches`
//! instead of spinning forever.

use log::debug;
use rand::Rng;

use crate::bits::BitString;
use crate::error::KeyGenError;
use crate::oracle::ChannelOracle;

/// Tunables for the generation loop.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Rounds per entangled-pair batch, qubits per BB84 batch, singlet
    /// pairs per E91 batch.
    pub batch_rounds: usize,
    /// Verification passes per entangled-pair batch. Every batch runs
    /// through verification twice before its code is taken; whether the
    /// second pass amplifies error detection or is redundant is
    /// undecided, so it stays a knob.
    pub verification_passes: usize,
    /// Shots per entangled-pair round verification.
    pub verification_shots: u32,
    /// Batch cap before the loop gives up on convergence.
    pub max_batches: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_rounds: 10,
            verification_passes: 2,
            verification_shots: 256,
            max_batches: 4096,
        }
    }
}

/// Accepted bits from one protocol batch, one fragment per party.
#[derive(Debug, Clone, Default)]
pub struct SiftedBits {
    pub alice: BitString,
    pub bob: BitString,
}

/// A finished key pair of the requested length.
///
/// The two keys are identical whenever the protocol's matching condition
/// was honestly satisfied; a divergence is a sifting bug, not legitimate
/// output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub alice: BitString,
    pub bob: BitString,
}

/// One QKD scheme: produces a batch of sifted, agreed bits per call.
pub trait KeyProtocol {
    /// Protocol tag used in responses and logs.
    fn label(&self) -> &'static str;

    /// Run one batch of rounds and return the accepted bits.
    fn run_batch<O: ChannelOracle, R: Rng>(
        &self,
        oracle: &O,
        rng: &mut R,
    ) -> Result<SiftedBits, KeyGenError>;
}

/// Run `protocol` until both fragments cover `length` bits, then truncate
/// to exactly `length`.
pub fn generate_key<P, O, R>(
    protocol: &P,
    length: usize,
    config: &EngineConfig,
    oracle: &O,
    rng: &mut R,
) -> Result<KeyPair, KeyGenError>
where
    P: KeyProtocol,
    O: ChannelOracle,
    R: Rng,
{
    if length == 0 {
        return Err(KeyGenError::InvalidLength);
    }

    let mut alice = BitString::new();
    let mut bob = BitString::new();
    let mut batches = 0usize;
    while alice.len() <= length {
        if batches >= config.max_batches {
            return Err(KeyGenError::DeadlineExceeded { batches });
        }
        let sifted = protocol.run_batch(oracle, rng)?;
        debug!(
            "{}: batch {} accepted {} bits ({} total)",
            protocol.label(),
            batches,
            sifted.alice.len(),
            alice.len() + sifted.alice.len(),
        );
        alice.append(&sifted.alice);
        bob.append(&sifted.bob);
        batches += 1;
    }

    alice.truncate(length);
    bob.truncate(length);
    debug!(
        "{}: delivered {} bit key after {} batches",
        protocol.label(),
        length,
        batches
    );
    Ok(KeyPair { alice, bob })
}
