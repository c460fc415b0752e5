use bouncer_verifier::verifier::RejectReason;

use super::_fixtures::{descriptor, segment, BILATERAL, COUNTER, TWIN_COUNTER, UNILATERAL};
use super::{mutated, reject};

#[test]
fn follow_on_state_change_is_rejected() {
    let certificate = mutated(&UNILATERAL, |c| {
        c.runs[0].transitions[1].transition.initial.state = 3;
    });
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::FollowOnMismatch, Some(0), Some(1))
    );
}

#[test]
fn follow_on_cell_disagreement_is_rejected() {
    // The sweep window claims a blank where the wall rewrite left a 1.
    let certificate = mutated(&BILATERAL, |c| {
        c.runs[0].transitions[3].transition.initial = segment(&[0], 1, 0);
    });
    assert_eq!(
        reject(&TWIN_COUNTER, &certificate),
        (RejectReason::FollowOnMismatch, Some(0), Some(3))
    );
}

#[test]
fn wall_transition_without_after_image_is_rejected() {
    let certificate = mutated(&UNILATERAL, |c| {
        c.runs[0].transitions[0].after_image = None;
    });
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::InvariantViolation, Some(0), Some(0))
    );
}

#[test]
fn run_must_end_with_an_after_image() {
    let certificate = mutated(&UNILATERAL, |c| {
        c.runs[0].transitions[3].after_image = None;
    });
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::InvariantViolation, Some(0), Some(3))
    );
}

#[test]
fn empty_run_is_rejected() {
    let certificate = mutated(&UNILATERAL, |c| c.runs[0].transitions.clear());
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::InvariantViolation, Some(0), None)
    );
}

#[test]
fn repeater_sweep_changing_state_is_a_shift_violation() {
    let certificate = mutated(&UNILATERAL, |c| {
        c.runs[0].transitions[1].transition.terminal.state = 3;
    });
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::RepeaterShiftViolation, Some(0), Some(1))
    );
}

#[test]
fn repeater_on_a_missing_partition_is_rejected() {
    let certificate = mutated(&UNILATERAL, |c| {
        c.runs[0].transitions[1].index = 4;
    });
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::InvariantViolation, Some(0), Some(1))
    );
}

#[test]
fn tampered_untouched_wall_is_an_after_image_mismatch() {
    let certificate = mutated(&UNILATERAL, |c| {
        c.runs[0].transitions[0].after_image = Some(descriptor(
            &[&[0, 1], &[1]],
            &[&[1]],
            &[1],
            2,
            -1,
            (0, 1),
        ));
    });
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::AfterImageMismatch, Some(0), Some(0))
    );
}

#[test]
fn inconsistent_repeater_after_image_is_rejected() {
    // Same layout as the derived descriptor but one copy short.
    let certificate = mutated(&UNILATERAL, |c| {
        c.runs[0].transitions[1].after_image = Some(descriptor(
            &[&[0], &[0]],
            &[&[1]],
            &[1],
            2,
            -1,
            (1, 0),
        ));
    });
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::AfterImageMismatch, Some(0), Some(1))
    );
}

#[test]
fn wrong_step_count_is_a_simulation_mismatch() {
    let certificate = mutated(&UNILATERAL, |c| {
        c.runs[0].transitions[2].transition.steps = 2;
    });
    assert_eq!(
        reject(&COUNTER, &certificate),
        (RejectReason::SimulationMismatch, Some(0), Some(2))
    );
}
