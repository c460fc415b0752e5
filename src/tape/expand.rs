//! Expansion and normalisation operators.
//!
//! Expansion rewrites a descriptor into an equivalent one whose walls are
//! wider: repeater copies are unrolled into a neighbouring wall, or blank
//! cells are appended to an outer wall. Unrolling the last copy of a block
//! collapses its partition, merging the two walls around it. Normalisation
//! runs the other way and is used to compare descriptors structurally.
//!
//! Every operator that adds wall cells charges them against an
//! [`ExpansionBudget`].

use thiserror::Error;

use super::{DescriptorError, TapeDescriptor};
use crate::machine::BLANK;

/// Failures raised by expansion operators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("expansion ceiling of {limit} cells exceeded")]
    LimitExceeded { limit: u64 },
    #[error("repeater periods differ next to wall {wall}")]
    PeriodMismatch { wall: usize },
    #[error("layouts diverged while expanding wall {wall}")]
    Diverged { wall: usize },
    #[error("wall {wall} does not exist")]
    NoSuchWall { wall: usize },
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Cumulative ceiling on the cells moved by expansion operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionBudget {
    limit: u64,
    used: u64,
}

impl ExpansionBudget {
    /// Budget allowing `limit` cells in total.
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    /// Cells charged so far.
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Charges `cells`, failing once the total passes the limit.
    pub fn charge(&mut self, cells: u64) -> Result<(), ExpandError> {
        let used = self.used.saturating_add(cells);
        if used > self.limit {
            return Err(ExpandError::LimitExceeded { limit: self.limit });
        }
        self.used = used;
        Ok(())
    }
}

fn to_i32(value: i64) -> Result<i32, ExpandError> {
    i32::try_from(value).map_err(|_| DescriptorError::CoordinateOverflow.into())
}

fn ensure_wall(td: &TapeDescriptor, wall: usize) -> Result<(), ExpandError> {
    if wall < td.walls.len() {
        Ok(())
    } else {
        Err(ExpandError::NoSuchWall { wall })
    }
}

/// Prepends `n` blank cells to `Wall[0]`.
pub fn expand_tape_leftward(
    td: &mut TapeDescriptor,
    n: u64,
    budget: &mut ExpansionBudget,
) -> Result<(), ExpandError> {
    if n == 0 {
        return Ok(());
    }
    budget.charge(n)?;
    let shift = to_i32(n as i64)?;
    let leftmost = td
        .leftmost
        .checked_sub(shift)
        .ok_or(DescriptorError::CoordinateOverflow)?;
    let head_offset = if td.head_wall == 0 {
        td.head_offset
            .checked_add(shift)
            .ok_or(DescriptorError::CoordinateOverflow)?
    } else {
        td.head_offset
    };
    let wall = &mut td.walls[0];
    let mut cells = vec![BLANK; n as usize];
    cells.extend_from_slice(wall);
    *wall = cells;
    td.leftmost = leftmost;
    td.head_offset = head_offset;
    Ok(())
}

/// Appends `n` blank cells to `Wall[P]`.
pub fn expand_tape_rightward(
    td: &mut TapeDescriptor,
    n: u64,
    budget: &mut ExpansionBudget,
) -> Result<(), ExpandError> {
    if n == 0 {
        return Ok(());
    }
    budget.charge(n)?;
    let rightmost = td
        .rightmost
        .checked_add(to_i32(n as i64)?)
        .ok_or(DescriptorError::CoordinateOverflow)?;
    let last = td.walls.len() - 1;
    let len = td.walls[last].len() + n as usize;
    td.walls[last].resize(len, BLANK);
    td.rightmost = rightmost;
    Ok(())
}

/// Merges `walls[partition]`, the block of `partition` and
/// `walls[partition + 1]` into one wall. The block must already be empty.
fn collapse_partition(td: &mut TapeDescriptor, partition: usize) -> Result<(), ExpandError> {
    let head_wall = td.head_wall as usize;
    let head_offset = if head_wall == partition + 1 {
        let left_len = to_i32(td.walls[partition].len() as i64)?;
        td.head_offset
            .checked_add(left_len)
            .ok_or(DescriptorError::CoordinateOverflow)?
    } else {
        td.head_offset
    };
    let right = td.walls.remove(partition + 1);
    td.walls[partition].extend(right);
    td.repeaters.remove(partition);
    td.counts.remove(partition);
    if head_wall == partition + 1 {
        td.head_wall = partition as u32;
        td.head_offset = head_offset;
    } else if head_wall > partition + 1 {
        td.head_wall -= 1;
    }
    Ok(())
}

/// Extends `walls[wall]` leftward until it starts at or before `target`.
/// Returns the index of the wall, which shrinks when a partition collapses.
pub fn cover_left(
    td: &mut TapeDescriptor,
    mut wall: usize,
    target: i64,
    budget: &mut ExpansionBudget,
) -> Result<usize, ExpandError> {
    ensure_wall(td, wall)?;
    loop {
        let start = td.wall_start(wall);
        if start <= target {
            return Ok(wall);
        }
        let need = (start - target) as u64;
        if wall == 0 {
            expand_tape_leftward(td, need, budget)?;
            return Ok(0);
        }
        let partition = wall - 1;
        let period = td.repeaters[partition].len() as u64;
        if period == 0 {
            return Err(DescriptorError::EmptyRepeater { partition }.into());
        }
        let copies = need.div_ceil(period).min(u64::from(td.counts[partition]));
        budget.charge(copies * period)?;
        let mut cells = Vec::with_capacity((copies * period) as usize + td.walls[wall].len());
        for _ in 0..copies {
            cells.extend_from_slice(&td.repeaters[partition]);
        }
        cells.extend_from_slice(&td.walls[wall]);
        td.walls[wall] = cells;
        td.counts[partition] -= copies as u32;
        if td.head_wall as usize == wall {
            td.head_offset = to_i32(i64::from(td.head_offset) + (copies * period) as i64)?;
        }
        if td.counts[partition] == 0 {
            collapse_partition(td, partition)?;
            wall = partition;
        }
    }
}

/// Extends `walls[wall]` rightward until it ends at or after `target_end`
/// (exclusive). Returns the index of the wall.
pub fn cover_right(
    td: &mut TapeDescriptor,
    wall: usize,
    target_end: i64,
    budget: &mut ExpansionBudget,
) -> Result<usize, ExpandError> {
    ensure_wall(td, wall)?;
    loop {
        let end = td.wall_end(wall);
        if end >= target_end {
            return Ok(wall);
        }
        let need = (target_end - end) as u64;
        if wall == td.partitions() {
            expand_tape_rightward(td, need, budget)?;
            return Ok(wall);
        }
        let period = td.repeaters[wall].len() as u64;
        if period == 0 {
            return Err(DescriptorError::EmptyRepeater { partition: wall }.into());
        }
        let copies = need.div_ceil(period).min(u64::from(td.counts[wall]));
        budget.charge(copies * period)?;
        let repeater = td.repeaters[wall].clone();
        for _ in 0..copies {
            td.walls[wall].extend_from_slice(&repeater);
        }
        td.counts[wall] -= copies as u32;
        if td.counts[wall] == 0 {
            collapse_partition(td, wall)?;
        }
    }
}

/// Unrolls repeater copies into `walls[wall]` from the left until it gains
/// at least `n` cells.
pub fn expand_wall_leftward(
    td: &mut TapeDescriptor,
    wall: usize,
    n: u64,
    budget: &mut ExpansionBudget,
) -> Result<usize, ExpandError> {
    ensure_wall(td, wall)?;
    let target = td.wall_start(wall) - n as i64;
    cover_left(td, wall, target, budget)
}

/// Unrolls repeater copies into `walls[wall]` from the right until it gains
/// at least `n` cells.
pub fn expand_wall_rightward(
    td: &mut TapeDescriptor,
    wall: usize,
    n: u64,
    budget: &mut ExpansionBudget,
) -> Result<usize, ExpandError> {
    ensure_wall(td, wall)?;
    let target = td.wall_end(wall) + n as i64;
    cover_right(td, wall, target, budget)
}

/// Expands `walls[wall]` of both descriptors leftward to a common start at
/// least `n` cells left of the earlier of the two.
pub fn expand_walls_leftward(
    td0: &mut TapeDescriptor,
    td1: &mut TapeDescriptor,
    wall: usize,
    n: u64,
    budget: &mut ExpansionBudget,
) -> Result<usize, ExpandError> {
    ensure_wall(td0, wall)?;
    ensure_wall(td1, wall)?;
    if wall > 0 && td0.repeaters.get(wall - 1) != td1.repeaters.get(wall - 1) {
        return Err(ExpandError::PeriodMismatch { wall });
    }
    let target = td0.wall_start(wall).min(td1.wall_start(wall)) - n as i64;
    let first = cover_left(td0, wall, target, budget)?;
    let second = cover_left(td1, wall, target, budget)?;
    if first != second || td0.wall_start(first) != td1.wall_start(second) {
        return Err(ExpandError::Diverged { wall });
    }
    Ok(first)
}

/// Expands `walls[wall]` of both descriptors rightward to a common end at
/// least `n` cells right of the later of the two.
pub fn expand_walls_rightward(
    td0: &mut TapeDescriptor,
    td1: &mut TapeDescriptor,
    wall: usize,
    n: u64,
    budget: &mut ExpansionBudget,
) -> Result<usize, ExpandError> {
    ensure_wall(td0, wall)?;
    ensure_wall(td1, wall)?;
    if td0.repeaters.get(wall) != td1.repeaters.get(wall) {
        return Err(ExpandError::PeriodMismatch { wall });
    }
    let target = td0.wall_end(wall).max(td1.wall_end(wall)) + n as i64;
    let first = cover_right(td0, wall, target, budget)?;
    let second = cover_right(td1, wall, target, budget)?;
    if first != second || td0.wall_end(first) != td1.wall_end(second) {
        return Err(ExpandError::Diverged { wall });
    }
    Ok(first)
}

/// Rewrites `td` into a canonical equivalent: repeater copies sitting at the
/// edge of a wall are folded back into their block unless the head is on
/// them, and blank cells at the outer ends of the tape are dropped unless
/// the head is on them.
pub fn normalize(td: &mut TapeDescriptor) {
    for partition in 0..td.partitions() {
        let period = td.repeaters[partition].len();
        if period == 0 {
            continue;
        }
        // Copies at the right end of the wall before the block.
        loop {
            let wall = &td.walls[partition];
            let Some(split) = wall.len().checked_sub(period) else {
                break;
            };
            let head_inside =
                td.head_wall as usize == partition && td.head_offset as usize >= split;
            if head_inside || wall[split..] != td.repeaters[partition][..] {
                break;
            }
            let Some(count) = td.counts[partition].checked_add(1) else {
                break;
            };
            td.walls[partition].truncate(split);
            td.counts[partition] = count;
        }
        // Copies at the left end of the wall after the block.
        loop {
            let wall = &td.walls[partition + 1];
            let head_inside =
                td.head_wall as usize == partition + 1 && (td.head_offset as usize) < period;
            if head_inside || wall.len() < period || wall[..period] != td.repeaters[partition][..] {
                break;
            }
            let Some(count) = td.counts[partition].checked_add(1) else {
                break;
            };
            td.walls[partition + 1].drain(..period);
            td.counts[partition] = count;
            if td.head_wall as usize == partition + 1 {
                td.head_offset -= period as i32;
            }
        }
    }

    let mut leading = td.walls[0].iter().take_while(|&&cell| cell == BLANK).count();
    if td.head_wall == 0 {
        leading = leading.min(td.head_offset.max(0) as usize);
    }
    if leading > 0 {
        td.walls[0].drain(..leading);
        td.leftmost += leading as i32;
        if td.head_wall == 0 {
            td.head_offset -= leading as i32;
        }
    }
    let last = td.walls.len() - 1;
    loop {
        let len = td.walls[last].len();
        let head_on_last = td.head_wall as usize == last && td.head_offset as usize + 1 == len;
        if head_on_last || td.walls[last].last() != Some(&BLANK) {
            break;
        }
        td.walls[last].pop();
        td.rightmost -= 1;
    }
}
