use bouncer_verifier::certificate::{Closure, Record};
use bouncer_verifier::config::VerifierConfig;
use bouncer_verifier::ser::SerKind;
use bouncer_verifier::verifier::{RejectReason, Verifier};
use bouncer_verifier::verify_certificate;
use insta::assert_snapshot;

use super::_fixtures::{COUNTER, UNILATERAL, UNILATERAL_BYTES};
use super::position;

fn from_bytes(bytes: &[u8]) -> bouncer_verifier::verifier::Outcome {
    verify_certificate(&*COUNTER, bytes, &VerifierConfig::default())
}

#[test]
fn truncated_closure_is_malformed() {
    let bytes = &UNILATERAL_BYTES[..UNILATERAL_BYTES.len() - 2];
    let outcome = from_bytes(bytes);
    assert_eq!(
        position(&outcome),
        (RejectReason::Malformed(SerKind::Closure), None, None)
    );
    assert_snapshot!(
        outcome.rejection().unwrap().to_string(),
        @"malformed closure: closure: unexpected end of input while reading `shift`"
    );
}

#[test]
fn trailing_bytes_are_malformed() {
    let mut bytes = UNILATERAL_BYTES.clone();
    bytes.push(0);
    assert_eq!(
        position(&from_bytes(&bytes)),
        (RejectReason::Malformed(SerKind::Certificate), None, None)
    );
}

#[test]
fn unknown_bouncer_type_is_malformed() {
    let mut bytes = UNILATERAL_BYTES.clone();
    bytes[4] = 9;
    assert_eq!(
        position(&from_bytes(&bytes)),
        (RejectReason::Malformed(SerKind::Header), None, None)
    );
}

#[test]
fn unknown_transition_kind_is_reported_inside_its_run() {
    // Header (17 bytes), initial tape (40 bytes) and the run start (4 bytes)
    // precede the kind byte of the first transition.
    let mut bytes = UNILATERAL_BYTES.clone();
    bytes[61] = 7;
    assert_eq!(
        position(&from_bytes(&bytes)),
        (RejectReason::Malformed(SerKind::Transition), Some(0), Some(0))
    );
}

#[test]
fn stream_ending_before_the_closure_is_malformed() {
    let records: Vec<_> = UNILATERAL.records().collect();
    let verifier = Verifier::new(&*COUNTER, VerifierConfig::default());
    let outcome = verifier.verify_records(records[..records.len() - 1].iter().cloned().map(Ok));
    assert_eq!(
        position(&outcome),
        (RejectReason::Malformed(SerKind::Certificate), None, None)
    );
}

#[test]
fn records_after_the_closure_are_malformed() {
    let extra = core::iter::once(Record::Closure(Closure { shift: 0 }));
    let verifier = Verifier::new(&*COUNTER, VerifierConfig::default());
    let outcome = verifier.verify_records(UNILATERAL.records().chain(extra).map(Ok));
    assert_eq!(
        position(&outcome),
        (RejectReason::Malformed(SerKind::Certificate), None, None)
    );
}

#[test]
fn transition_in_place_of_a_run_start_is_malformed() {
    let mut records: Vec<_> = UNILATERAL.records().collect();
    records.remove(2);
    let verifier = Verifier::new(&*COUNTER, VerifierConfig::default());
    let outcome = verifier.verify_records(records.into_iter().map(Ok));
    assert_eq!(
        position(&outcome),
        (RejectReason::Malformed(SerKind::Certificate), Some(0), None)
    );
}
