use super::errors::{CheckError, RejectReason};
use super::transition::StepBudget;
use crate::machine::{ConcreteTape, TransitionTable};
use crate::tape::{check_tapes_equivalent, normalize, TapeDescriptor};

fn closure_mismatch(detail: impl Into<String>) -> CheckError {
    CheckError::new(RejectReason::ClosureMismatch, detail)
}

/// Checks that the descriptor reached at the end of the cycle is the initial
/// one with every repeater count grown (or kept), displaced by `shift`.
///
/// Growth pushes the walls on the far side of a block apart, so the layout
/// is anchored on the wall that moved least: `shift` must be that wall's
/// displacement. Unilateral and bilateral cycles leave some wall in place
/// and close with shift 0.
///
/// Both descriptors are normalised first so that different but equivalent
/// unrollings compare equal.
pub fn check_closure(
    initial: &TapeDescriptor,
    current: &TapeDescriptor,
    shift: i32,
) -> Result<(), CheckError> {
    let mut start = initial.clone();
    let mut end = current.clone();
    normalize(&mut start);
    normalize(&mut end);

    if start.walls != end.walls || start.repeaters != end.repeaters {
        return Err(closure_mismatch("final layout differs from the initial one"));
    }
    if (start.head_wall, start.head_offset) != (end.head_wall, end.head_offset) {
        return Err(closure_mismatch(format!(
            "head ends at wall {} offset {} instead of wall {} offset {}",
            end.head_wall, end.head_offset, start.head_wall, start.head_offset
        )));
    }
    if start.state != end.state {
        return Err(closure_mismatch(format!(
            "cycle ends in state {} instead of {}",
            end.state, start.state
        )));
    }
    if let Some(partition) = (0..start.partitions()).find(|&i| end.counts[i] < start.counts[i]) {
        return Err(closure_mismatch(format!(
            "block {partition} shrank from {} to {} copies",
            start.counts[partition], end.counts[partition]
        )));
    }

    let moved: Vec<i64> = (0..start.walls.len())
        .map(|wall| end.wall_start(wall) - start.wall_start(wall))
        .collect();
    let least = moved.iter().map(|d| d.unsigned_abs()).min().unwrap_or(0);
    let shift = i64::from(shift);
    let Some(anchor) = moved
        .iter()
        .position(|&d| d == shift && d.unsigned_abs() == least)
    else {
        return Err(closure_mismatch(format!(
            "walls moved by {moved:?} but the certificate claims {shift}"
        )));
    };

    let target = start.wall_start(anchor) + shift;
    let mut grown = start;
    grown.counts.clone_from(&end.counts);
    let offset = grown.wall_start(anchor) - i64::from(grown.leftmost);
    grown.set_window(target - offset)?;
    check_tapes_equivalent(&grown, &end).map_err(|err| closure_mismatch(err.to_string()))
}

/// Simulates `steps` steps from the blank tape and checks that the result is
/// the configuration described by `initial`.
pub fn check_initial_tape<M: TransitionTable + ?Sized>(
    machine: &M,
    initial: &TapeDescriptor,
    steps: u32,
    budget: &mut StepBudget,
) -> Result<(), CheckError> {
    budget.charge(u64::from(steps))?;
    let mut tape = ConcreteTape::blank();
    if let Some(done) = tape.run(machine, u64::from(steps)) {
        return Err(CheckError::new(
            RejectReason::SimulationMismatch,
            format!("machine halted after {done} of {steps} startup steps"),
        ));
    }
    let too_wide = |_| CheckError::invariant("startup tape does not fit in i32 coordinates");
    let leftmost = i32::try_from(tape.leftmost()).map_err(too_wide)?;
    let head_offset = i32::try_from(tape.head() - tape.leftmost()).map_err(too_wide)?;
    let reached = TapeDescriptor::single_wall(tape.cells(), leftmost, head_offset, tape.state())?;
    check_tapes_equivalent(&reached, initial).map_err(|err| {
        CheckError::new(
            RejectReason::SimulationMismatch,
            format!("startup simulation does not reach the initial tape: {err}"),
        )
    })
}
