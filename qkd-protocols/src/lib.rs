//! # qkd-protocols
//!
//! Simulated quantum-key-distribution protocol engine.
//!
//! Three schemes let Alice and Bob derive a shared bit-string key over a
//! simulated quantum channel:
//!
//! - **Entangled-pair pairing/grouping** ([`pairing`]): Alice entangles two
//!   disjoint qubit pairs into one of four Bell-state combinations, Bob
//!   stacks the inverse of his own guess on top, and the channel verifies
//!   the guess by repeated sampling. Confirmed rounds contribute the group
//!   code's two bits.
//! - **BB84** ([`bb84`]): per-qubit basis encoding and measurement, with
//!   classical sifting on basis agreement.
//! - **E91** ([`e91`]): singlet pairs measured under independently chosen
//!   settings; the two designated correlated setting combinations feed the
//!   key.
//!
//! The [`engine`] module owns the shared batching loop: run protocol
//! batches until the accumulated sifted bits cover the requested length,
//! then truncate. On success both parties hold identical keys; divergence
//! would be a protocol bug, never legitimate output.
//!
//! All randomness is threaded through caller-supplied [`rand::Rng`]
//! instances, one per request, so runs are independent and seedable.

pub mod bb84;
pub mod bits;
pub mod choices;
pub mod e91;
pub mod engine;
pub mod error;
pub mod oracle;
pub mod pairing;
pub mod party;

pub mod prelude {
    pub use crate::bb84::*;
    pub use crate::bits::*;
    pub use crate::choices::*;
    pub use crate::e91::*;
    pub use crate::engine::*;
    pub use crate::error::*;
    pub use crate::oracle::*;
    pub use crate::pairing::*;
    pub use crate::party::*;
}
