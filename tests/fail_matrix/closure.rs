use bouncer_verifier::certificate::BouncerType;
use bouncer_verifier::verifier::RejectReason;

use super::_fixtures::{COUNTER, DRIFTER, TRANSLATED, UNILATERAL};
use super::{mutated, reject};

#[test]
fn translated_certificate_with_wrong_shift_does_not_close() {
    let certificate = mutated(&TRANSLATED, |c| c.closure.shift = 2);
    assert_eq!(
        reject(&DRIFTER, &certificate),
        (RejectReason::ClosureMismatch, None, None)
    );
}

#[test]
fn non_translated_certificate_must_not_shift() {
    let certificate = mutated(&UNILATERAL, |c| c.closure.shift = 1);
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::InvariantViolation, None, None)
    );
}

#[test]
fn translated_certificate_must_shift() {
    let certificate = mutated(&TRANSLATED, |c| c.closure.shift = 0);
    assert_eq!(
        reject(&DRIFTER, &certificate),
        (RejectReason::InvariantViolation, None, None)
    );
}

#[test]
fn drifting_certificate_declared_unilateral_is_rejected() {
    let certificate = mutated(&TRANSLATED, |c| {
        c.header.bouncer_type = BouncerType::Unilateral;
        c.closure.shift = 0;
    });
    assert_eq!(
        reject(&DRIFTER, &certificate),
        (RejectReason::ClosureMismatch, None, None)
    );
}

#[test]
fn startup_that_misses_the_initial_tape_is_rejected() {
    let certificate = mutated(&UNILATERAL, |c| c.header.initial_steps = 2);
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::SimulationMismatch, None, None)
    );
}

#[test]
fn header_partitions_must_match_the_initial_tape() {
    let certificate = mutated(&UNILATERAL, |c| c.header.partitions = 2);
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::InvariantViolation, None, None)
    );
}
