
#[path = "fail_matrix/closure.rs"]
mod closure;
#[path = "fail_matrix/runs.rs"]
mod runs;
#[path = "fail_matrix/stream.rs"]
mod stream;

use bouncer_verifier::certificate::Certificate;
use bouncer_verifier::config::VerifierConfig;
use bouncer_verifier::machine::Machine;
use bouncer_verifier::verifier::{Outcome, RejectReason, Verifier};

/// Where and why a certificate was rejected.
pub type Position = (RejectReason, Option<u32>, Option<u32>);

pub fn position(outcome: &Outcome) -> Position {
    let rejection = outcome
        .rejection()
        .unwrap_or_else(|| panic!("expected a rejection, got {outcome:?}"));
    (rejection.reason, rejection.run, rejection.transition)
}

pub fn reject(machine: &Machine, certificate: &Certificate) -> Position {
    position(&Verifier::new(machine, VerifierConfig::default()).verify(certificate))
}

/// Applies `mutate` to a copy of `certificate`.
pub fn mutated(certificate: &Certificate, mutate: impl FnOnce(&mut Certificate)) -> Certificate {
    let mut copy = certificate.clone();
    mutate(&mut copy);
    copy
}
