use thiserror::Error;

use super::{TapeDescriptor, TapeWalker};
use crate::machine::{Symbol, TmState, BLANK};

/// First difference found between two descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("states differ ({left} vs {right})")]
    State { left: TmState, right: TmState },
    #[error("head positions differ ({left} vs {right})")]
    Head { left: i64, right: i64 },
    #[error("cell {position} differs ({left} vs {right})")]
    Cell {
        position: i64,
        left: Symbol,
        right: Symbol,
    },
}

/// Decides whether two descriptors denote the same concrete configuration:
/// equal states, equal absolute head positions, and equal cells over the
/// union of both windows (blank outside each window).
pub fn check_tapes_equivalent(
    left: &TapeDescriptor,
    right: &TapeDescriptor,
) -> Result<(), Mismatch> {
    if left.state != right.state {
        return Err(Mismatch::State {
            left: left.state,
            right: right.state,
        });
    }
    let (left_head, right_head) = (left.head_abs(), right.head_abs());
    if left_head != right_head {
        return Err(Mismatch::Head {
            left: left_head,
            right: right_head,
        });
    }
    check_cells_equal(
        left,
        right,
        i64::from(left.leftmost.min(right.leftmost)),
        i64::from(left.rightmost.max(right.rightmost)),
    )
}

/// Compares the cells of two descriptors over `[start, end]`.
pub fn check_cells_equal(
    left: &TapeDescriptor,
    right: &TapeDescriptor,
    start: i64,
    end: i64,
) -> Result<(), Mismatch> {
    let mut lhs = TapeWalker::seek(left, start);
    let mut rhs = TapeWalker::seek(right, start);
    for position in start..=end {
        let a = lhs.next_cell().unwrap_or(BLANK);
        let b = rhs.next_cell().unwrap_or(BLANK);
        if a != b {
            return Err(Mismatch::Cell {
                position,
                left: a,
                right: b,
            });
        }
    }
    Ok(())
}
