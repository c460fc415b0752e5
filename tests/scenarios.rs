
use _fixtures::{
    encode, BILATERAL, BILATERAL_BYTES, CORRUPTED_SEGMENT, COUNTER, DRIFTER, HALTING_COUNTER,
    TRANSLATED, TRANSLATED_BYTES, TWIN_COUNTER, UNILATERAL, UNILATERAL_BYTES, ZERO_COUNT,
};
use bouncer_verifier::certificate::{certificate_digest, BouncerType, Certificate};
use bouncer_verifier::config::{BellPolicy, VerifierConfig};
use bouncer_verifier::machine::Machine;
use bouncer_verifier::verifier::{Outcome, RejectReason, SkipReason, Verifier, VerifySummary};
use bouncer_verifier::verify_certificate;

fn verify(machine: &Machine, certificate: &Certificate) -> Outcome {
    Verifier::new(machine, VerifierConfig::default()).verify(certificate)
}

fn summary(outcome: Outcome) -> VerifySummary {
    match outcome {
        Outcome::Verified(summary) => summary,
        other => panic!("expected a verified certificate, got {other:?}"),
    }
}

fn rejected_at(outcome: &Outcome) -> (RejectReason, Option<u32>, Option<u32>) {
    let rejection = outcome.rejection().expect("certificate must be rejected");
    (rejection.reason, rejection.run, rejection.transition)
}

#[test]
fn unilateral_counter_is_verified() {
    let summary = summary(verify(&COUNTER, &UNILATERAL));
    assert_eq!(summary.machine_id, 101);
    assert_eq!(summary.bouncer_type, BouncerType::Unilateral);
    assert_eq!((summary.partitions, summary.runs), (1, 1));
    assert_eq!(summary.transitions, 4);
    assert_eq!(summary.simulated_steps, 7);
    assert_eq!(summary.max_repeater_period, 1);
    assert_eq!(summary.digest, None);
}

#[test]
fn bilateral_twin_counter_is_verified() {
    let summary = summary(verify(&TWIN_COUNTER, &BILATERAL));
    assert_eq!(summary.bouncer_type, BouncerType::Bilateral);
    assert_eq!((summary.partitions, summary.runs), (2, 2));
    assert_eq!(summary.transitions, 8);
    assert_eq!(summary.simulated_steps, 19);
}

#[test]
fn translated_drifter_is_verified() {
    let summary = summary(verify(&DRIFTER, &TRANSLATED));
    assert_eq!(summary.bouncer_type, BouncerType::Translated);
    assert_eq!(summary.transitions, 4);
    assert_eq!(summary.simulated_steps, 25);
}

#[test]
fn verifying_bytes_matches_the_in_memory_path() {
    let cases: [(&Machine, &Certificate, &[u8]); 3] = [
        (&COUNTER, &UNILATERAL, &UNILATERAL_BYTES),
        (&TWIN_COUNTER, &BILATERAL, &BILATERAL_BYTES),
        (&DRIFTER, &TRANSLATED, &TRANSLATED_BYTES),
    ];
    for (machine, certificate, bytes) in cases {
        let from_bytes = summary(verify_certificate(machine, bytes, &VerifierConfig::default()));
        assert_eq!(from_bytes.digest, Some(certificate_digest(bytes)));
        let in_memory = summary(verify(machine, certificate));
        assert_eq!(
            VerifySummary {
                digest: None,
                ..from_bytes
            },
            in_memory
        );
    }
}

#[test]
fn certificate_for_another_machine_is_rejected() {
    let outcome = verify(&TWIN_COUNTER, &UNILATERAL);
    assert!(!outcome.is_verified());
}

#[test]
fn corrupted_final_segment_is_a_segment_mismatch() {
    let outcome = verify(&COUNTER, &CORRUPTED_SEGMENT);
    assert_eq!(
        rejected_at(&outcome),
        (RejectReason::SegmentMismatch, Some(0), Some(0))
    );
}

#[test]
fn halting_wall_rewrite_is_a_simulation_mismatch() {
    let outcome = verify(&HALTING_COUNTER, &UNILATERAL);
    assert_eq!(
        rejected_at(&outcome),
        (RejectReason::SimulationMismatch, Some(0), Some(0))
    );
}

#[test]
fn zero_count_in_the_initial_tape_is_an_invariant_violation() {
    let outcome = verify(&COUNTER, &ZERO_COUNT);
    assert_eq!(
        rejected_at(&outcome),
        (RejectReason::InvariantViolation, None, None)
    );
}

#[test]
fn bell_certificates_follow_the_policy() {
    let mut bell = UNILATERAL.clone();
    bell.header.bouncer_type = BouncerType::Bell;

    assert_eq!(
        verify(&COUNTER, &bell),
        Outcome::Skipped(SkipReason::Bell)
    );

    let strict = Verifier::new(&*COUNTER, VerifierConfig::with_bell_policy(BellPolicy::Reject));
    assert_eq!(
        rejected_at(&strict.verify(&bell)),
        (RejectReason::InvariantViolation, None, None)
    );
}

#[test]
fn bell_skip_does_not_decode_past_the_header() {
    let mut bell = UNILATERAL.clone();
    bell.header.bouncer_type = BouncerType::Bell;
    let mut bytes = encode(&bell);
    bytes.truncate(17);
    let outcome = verify_certificate(&*COUNTER, &bytes, &VerifierConfig::default());
    assert_eq!(outcome, Outcome::Skipped(SkipReason::Bell));
}

#[test]
fn rejection_display_names_the_position() {
    let outcome = verify(&COUNTER, &CORRUPTED_SEGMENT);
    let rejection = outcome.rejection().expect("rejected");
    let text = rejection.to_string();
    assert!(text.starts_with("segment mismatch at run 0, transition 0: "), "{text}");
}
