//! Verifier core for bouncer certificates.
//!
//! A bouncer is a non-halting Turing machine whose tape keeps the shape
//! `Wall[0] · Repeater[0]^n0 · Wall[1] · … · Wall[P]` while the head bounces
//! between the walls and the counts grow. A certificate describes one cycle
//! of that motion as a list of locally checkable transitions; this crate
//! checks each of them against the machine and decides whether the cycle
//! closes back onto its starting tape.
//!
//! The entry point is [`verifier::Verifier`]; [`verify_certificate`] wraps it
//! for callers holding the canonical certificate bytes.

pub mod certificate;
pub mod config;
pub mod machine;
pub mod ser;
pub mod tape;
pub mod utils;
pub mod verifier;

use config::VerifierConfig;
use machine::TransitionTable;
use verifier::{Outcome, Verifier};

/// Decodes and verifies one certificate for `machine`.
pub fn verify_certificate<M: TransitionTable + ?Sized>(
    machine: &M,
    bytes: &[u8],
    config: &VerifierConfig,
) -> Outcome {
    Verifier::new(machine, *config).verify_bytes(bytes)
}
