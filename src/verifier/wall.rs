//! Wall transitions: a local rewrite of the cells around the head.
//!
//! Both descriptors are first aligned: the rewritten wall is widened in each
//! of them until it covers the segment window and both walls share the same
//! bounds. After alignment the rewrite may only touch the window, so every
//! other part of the layout must agree exactly.

use super::errors::{expansion_error, CheckError, RejectReason};
use super::segment::check_segment;
use super::transition::check_transition;
use super::Budgets;
use crate::machine::{Symbol, TransitionTable, BLANK};
use crate::tape::{
    cover_left, cover_right, ExpansionBudget, SegmentTransition, TapeContext, TapeDescriptor,
};

fn after_image(detail: String) -> CheckError {
    CheckError::new(RejectReason::AfterImageMismatch, detail)
}

/// Widens `walls[wall]` of both descriptors to a common span covering
/// `[low, high)`. Returns the wall index, which is the same in both.
///
/// A window that needs a whole repeater block unrolled only holds for the
/// current count, so exhausting a block is refused.
fn align(
    a: &mut TapeDescriptor,
    b: &mut TapeDescriptor,
    wall: usize,
    low: i64,
    high: i64,
    budget: &mut ExpansionBudget,
) -> Result<usize, CheckError> {
    let map = |err| expansion_error(err, RejectReason::AfterImageMismatch);
    if wall >= b.walls.len() {
        return Err(after_image(format!("after-image has no wall {wall}")));
    }
    let layout = (a.partitions(), b.partitions());
    let target = low.min(a.wall_start(wall)).min(b.wall_start(wall));
    let left_a = cover_left(a, wall, target, budget).map_err(map)?;
    let left_b = cover_left(b, wall, target, budget).map_err(map)?;
    if left_a != left_b {
        return Err(after_image(format!(
            "wall {wall} lands on index {left_a} before and {left_b} after"
        )));
    }
    let target = high.max(a.wall_end(left_a)).max(b.wall_end(left_b));
    let wall = cover_right(a, left_a, target, budget).map_err(map)?;
    let right_b = cover_right(b, left_b, target, budget).map_err(map)?;
    if (a.partitions(), b.partitions()) != layout {
        return Err(CheckError::new(
            RejectReason::SegmentMismatch,
            format!("window around wall {wall} swallows a whole repeater block"),
        ));
    }
    if right_b != wall
        || a.wall_start(wall) != b.wall_start(wall)
        || a.wall_end(wall) != b.wall_end(wall)
    {
        return Err(after_image(format!(
            "wall {wall} cannot be aligned with the after-image"
        )));
    }
    Ok(wall)
}

/// Outer walls may carry different amounts of blank padding.
fn trimmed(td: &TapeDescriptor, wall: usize) -> &[Symbol] {
    let cells = &td.walls[wall][..];
    if wall == 0 {
        let start = cells.iter().position(|&s| s != BLANK).unwrap_or(cells.len());
        &cells[start..]
    } else if wall == td.partitions() {
        let end = cells.iter().rposition(|&s| s != BLANK).map_or(0, |i| i + 1);
        &cells[..end]
    } else {
        cells
    }
}

/// Checks that `a` and `b` agree everywhere except on `[low, high)` inside
/// the aligned wall.
fn check_outside(
    a: &TapeDescriptor,
    b: &TapeDescriptor,
    wall: usize,
    low: i64,
    high: i64,
) -> Result<(), CheckError> {
    if a.repeaters != b.repeaters || a.counts != b.counts {
        return Err(after_image(
            "repeater blocks differ from the after-image".to_string(),
        ));
    }
    for index in (0..a.walls.len()).filter(|&index| index != wall) {
        if trimmed(a, index) != trimmed(b, index) {
            return Err(after_image(format!("untouched wall {index} differs")));
        }
    }
    let outside = (a.wall_start(wall)..a.wall_end(wall)).filter(|p| !(low..high).contains(p));
    for position in outside {
        if a.cell_at(position) != b.cell_at(position) {
            return Err(after_image(format!(
                "cell {position} outside the rewritten window differs"
            )));
        }
    }
    Ok(())
}

/// Checks a wall transition of `before` into `after` on `walls[wall]`.
pub fn check_wall_transition<M: TransitionTable + ?Sized>(
    machine: &M,
    before: &TapeDescriptor,
    after: &TapeDescriptor,
    tr: &SegmentTransition,
    wall: usize,
    budgets: &mut Budgets,
) -> Result<(), CheckError> {
    if wall >= before.walls.len() {
        return Err(CheckError::invariant(format!(
            "wall {wall} does not exist in a layout of {} walls",
            before.walls.len()
        )));
    }
    tr.validate(&TapeContext::of(machine))?;

    let start = before.head_abs() - i64::from(tr.initial.head);
    if after.head_abs() - i64::from(tr.terminal.head) != start {
        return Err(CheckError::new(
            RejectReason::SegmentMismatch,
            "initial and final windows are not at the same place",
        ));
    }
    let end = start + tr.initial.len() as i64;

    let mut a = before.clone();
    let mut b = after.clone();
    let mut wall = align(&mut a, &mut b, wall, start, end, &mut budgets.expansion)?;
    check_segment(&a, &tr.initial, wall)?;
    check_segment(&b, &tr.terminal, wall)?;

    let window = check_transition(machine, tr, &mut budgets.steps)?;
    let low = start + window.offset();
    let high = end + window.read_right as i64;
    if window.has_excursion() {
        wall = align(&mut a, &mut b, wall, low, high, &mut budgets.expansion)?;
        let len = window.initial_cells.len();
        if a.read_window(low, len) != window.initial_cells
            || b.read_window(low, len) != window.final_cells
        {
            return Err(CheckError::new(
                RejectReason::SegmentMismatch,
                "cells read outside the window disagree with the descriptors",
            ));
        }
    }
    check_outside(&a, &b, wall, low, high)
}
