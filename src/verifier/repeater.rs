//! Repeater transitions: the head sweeps a whole block in one direction.
//!
//! The claim is checked on a single copy. Before the sweep one copy of the
//! repeater sits unrolled in the wall next to its block with the head on
//! its near edge; the segment is that copy plus a context on the far side.
//! If the copy turns into `R'`, the head ends on the first context cell in
//! the same state, and the context is both a periodic extension of `R` and
//! the cells found past the block, then induction over the count turns the
//! whole block into `R'` and leaves the head on the far wall.

use super::errors::{CheckError, RejectReason};
use super::transition::check_transition;
use super::Budgets;
use crate::machine::{Direction, TransitionTable};
use crate::tape::{
    check_tapes_equivalent, DescriptorError, SegmentTransition, TapeContext, TapeDescriptor,
};

fn shift_violation(detail: impl Into<String>) -> CheckError {
    CheckError::new(RejectReason::RepeaterShiftViolation, detail)
}

fn segment_mismatch(detail: impl Into<String>) -> CheckError {
    CheckError::new(RejectReason::SegmentMismatch, detail)
}

fn bump_count(td: &mut TapeDescriptor, partition: usize) -> Result<(), CheckError> {
    td.counts[partition] = td.counts[partition]
        .checked_add(1)
        .ok_or_else(|| CheckError::invariant(format!("count of partition {partition} overflows")))?;
    Ok(())
}

fn ensure_partition<M: TransitionTable + ?Sized>(
    machine: &M,
    td: &TapeDescriptor,
    partition: usize,
    tr: &SegmentTransition,
) -> Result<(), CheckError> {
    if partition >= td.partitions() {
        return Err(CheckError::invariant(format!(
            "partition {partition} does not exist in a layout of {} partitions",
            td.partitions()
        )));
    }
    tr.validate(&TapeContext::of(machine))?;
    Ok(())
}

fn to_offset(value: usize) -> Result<i32, CheckError> {
    i32::try_from(value).map_err(|_| DescriptorError::CoordinateOverflow.into())
}

/// Checks a rightward sweep across the block of `partition` and returns the
/// descriptor it leads to.
pub fn check_rightward_repeater<M: TransitionTable + ?Sized>(
    machine: &M,
    td: &TapeDescriptor,
    partition: usize,
    tr: &SegmentTransition,
    budgets: &mut Budgets,
) -> Result<TapeDescriptor, CheckError> {
    ensure_partition(machine, td, partition, tr)?;
    let repeater = &td.repeaters[partition];
    let period = repeater.len();
    let wall = &td.walls[partition];
    if td.head_wall as usize != partition || td.head_offset as usize + period != wall.len() {
        return Err(shift_violation(format!(
            "head is not on the copy unrolled at the end of wall {partition}"
        )));
    }
    if wall[wall.len() - period..] != repeater[..] {
        return Err(segment_mismatch(format!(
            "wall {partition} does not end with a copy of its repeater"
        )));
    }

    let (initial, terminal) = (&tr.initial, &tr.terminal);
    if initial.head != 0 || initial.len() < period {
        return Err(shift_violation("initial segment does not start on the copy"));
    }
    if initial.state != td.state || initial.tape[..period] != repeater[..] {
        return Err(segment_mismatch("initial segment does not show the copy"));
    }
    let context = &initial.tape[period..];
    if i64::from(terminal.head) != period as i64
        || terminal.state != initial.state
        || terminal.tape[period..] != *context
    {
        return Err(shift_violation(
            "sweep must end one period further in the same state with the context intact",
        ));
    }
    if context
        .iter()
        .enumerate()
        .any(|(k, &symbol)| symbol != repeater[k % period])
    {
        return Err(shift_violation("context is not a periodic extension of the repeater"));
    }
    if context.len() > td.walls[partition + 1].len() {
        return Err(segment_mismatch(format!(
            "context runs past wall {}",
            partition + 1
        )));
    }
    if td.read_window(td.wall_start(partition + 1), context.len()) != context {
        return Err(segment_mismatch(format!(
            "context disagrees with the cells after block {partition}"
        )));
    }

    let window = check_transition(machine, tr, &mut budgets.steps)?;
    if window.has_excursion() {
        return Err(shift_violation("sweep reads cells outside its segment"));
    }

    let mut next = td.clone();
    let split = next.walls[partition].len() - period;
    next.walls[partition].truncate(split);
    next.repeaters[partition] = terminal.tape[..period].to_vec();
    bump_count(&mut next, partition)?;
    if next.walls[partition + 1].is_empty() {
        return Err(shift_violation(format!(
            "wall {} is empty and cannot hold the head",
            partition + 1
        )));
    }
    next.head_wall += 1;
    next.head_offset = 0;
    next.state = terminal.state;
    Ok(next)
}

/// Checks a leftward sweep across the block of `partition` and returns the
/// descriptor it leads to.
pub fn check_leftward_repeater<M: TransitionTable + ?Sized>(
    machine: &M,
    td: &TapeDescriptor,
    partition: usize,
    tr: &SegmentTransition,
    budgets: &mut Budgets,
) -> Result<TapeDescriptor, CheckError> {
    ensure_partition(machine, td, partition, tr)?;
    let repeater = &td.repeaters[partition];
    let period = repeater.len();
    let wall = &td.walls[partition + 1];
    if td.head_wall as usize != partition + 1 || td.head_offset as usize + 1 != period {
        return Err(shift_violation(format!(
            "head is not on the copy unrolled at the start of wall {}",
            partition + 1
        )));
    }
    if wall.len() < period || wall[..period] != repeater[..] {
        return Err(segment_mismatch(format!(
            "wall {} does not start with a copy of its repeater",
            partition + 1
        )));
    }

    let (initial, terminal) = (&tr.initial, &tr.terminal);
    let Some(reach) = initial.len().checked_sub(period) else {
        return Err(shift_violation("initial segment is shorter than the repeater"));
    };
    if i64::from(initial.head) != (reach + period - 1) as i64 {
        return Err(shift_violation("initial segment does not end on the copy"));
    }
    if initial.state != td.state || initial.tape[reach..] != repeater[..] {
        return Err(segment_mismatch("initial segment does not show the copy"));
    }
    let context = &initial.tape[..reach];
    if i64::from(terminal.head) != reach as i64 - 1
        || terminal.state != initial.state
        || terminal.tape[..reach] != *context
    {
        return Err(shift_violation(
            "sweep must end one period further in the same state with the context intact",
        ));
    }
    if (0..reach).any(|k| context[reach - 1 - k] != repeater[period - 1 - k % period]) {
        return Err(shift_violation("context is not a periodic extension of the repeater"));
    }
    if reach > td.walls[partition].len() {
        return Err(segment_mismatch(format!("context runs past wall {partition}")));
    }
    let start = td.wall_end(partition) - reach as i64;
    if td.read_window(start, reach) != context {
        return Err(segment_mismatch(format!(
            "context disagrees with the cells before block {partition}"
        )));
    }

    let window = check_transition(machine, tr, &mut budgets.steps)?;
    if window.has_excursion() {
        return Err(shift_violation("sweep reads cells outside its segment"));
    }

    let mut next = td.clone();
    next.walls[partition + 1].drain(..period);
    next.repeaters[partition] = terminal.tape[reach..].to_vec();
    bump_count(&mut next, partition)?;
    let Some(last) = next.walls[partition].len().checked_sub(1) else {
        return Err(shift_violation(format!(
            "wall {partition} is empty and cannot hold the head"
        )));
    };
    next.head_wall = partition as u32;
    next.head_offset = to_offset(last)?;
    next.state = terminal.state;
    Ok(next)
}

/// Checks a sweep of the head across the block of `partition` and returns
/// the descriptor that follows it: `after` when supplied, otherwise the one
/// derived from the sweep.
pub fn check_repeater_transition<M: TransitionTable + ?Sized>(
    machine: &M,
    before: &TapeDescriptor,
    direction: Direction,
    partition: usize,
    tr: &SegmentTransition,
    after: Option<&TapeDescriptor>,
    budgets: &mut Budgets,
) -> Result<TapeDescriptor, CheckError> {
    let expected = match direction {
        Direction::Right => check_rightward_repeater(machine, before, partition, tr, budgets)?,
        Direction::Left => check_leftward_repeater(machine, before, partition, tr, budgets)?,
    };
    let Some(after) = after else {
        return Ok(expected);
    };
    if after.repeaters != expected.repeaters {
        return Err(CheckError::new(
            RejectReason::AfterImageMismatch,
            "after-image repeaters differ from the swept blocks",
        ));
    }
    check_tapes_equivalent(&expected, after)
        .map_err(|err| CheckError::new(RejectReason::AfterImageMismatch, err.to_string()))?;
    Ok(after.clone())
}
