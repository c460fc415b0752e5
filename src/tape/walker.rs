//! Cell-by-cell traversal of a tape descriptor.

use super::TapeDescriptor;
use crate::machine::{Symbol, BLANK};

/// Location of a cell inside the layout of a [`TapeDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapePosition {
    /// Left of `leftmost`.
    Before,
    /// Inside `walls[wall]`.
    Wall { wall: usize, offset: usize },
    /// Inside copy `repeat` of `repeaters[partition]`.
    Repeater {
        partition: usize,
        repeat: u32,
        offset: usize,
    },
    /// Right of `rightmost`.
    Finished,
}

/// Maps an absolute coordinate onto the descriptor layout without walking
/// repeater blocks cell by cell.
pub fn locate(td: &TapeDescriptor, position: i64) -> TapePosition {
    let mut start = i64::from(td.leftmost);
    if position < start {
        return TapePosition::Before;
    }
    for wall in 0..td.walls.len() {
        let len = td.walls[wall].len() as i64;
        if position < start + len {
            return TapePosition::Wall {
                wall,
                offset: (position - start) as usize,
            };
        }
        start += len;
        if wall < td.partitions() {
            let block = td.block_len(wall) as i64;
            if position < start + block {
                let period = td.repeaters[wall].len() as i64;
                let relative = position - start;
                return TapePosition::Repeater {
                    partition: wall,
                    repeat: (relative / period) as u32,
                    offset: (relative % period) as usize,
                };
            }
            start += block;
        }
    }
    TapePosition::Finished
}

/// Iterator over the cells of a descriptor from a starting coordinate.
///
/// Cells left of `leftmost` read as blank; the iterator ends after
/// `rightmost`.
#[derive(Debug, Clone)]
pub struct TapeWalker<'a> {
    td: &'a TapeDescriptor,
    position: TapePosition,
    abs: i64,
}

impl<'a> TapeWalker<'a> {
    /// Walker positioned on the first described cell.
    pub fn new(td: &'a TapeDescriptor) -> Self {
        Self::seek(td, i64::from(td.leftmost))
    }

    /// Walker positioned on an arbitrary absolute coordinate.
    pub fn seek(td: &'a TapeDescriptor, abs: i64) -> Self {
        Self {
            td,
            position: locate(td, abs),
            abs,
        }
    }

    /// Current layout position.
    pub fn position(&self) -> TapePosition {
        self.position
    }

    /// Absolute coordinate of the next cell to be returned.
    pub fn abs(&self) -> i64 {
        self.abs
    }

    /// Returns the current cell and advances, or `None` past `rightmost`.
    pub fn next_cell(&mut self) -> Option<Symbol> {
        let td = self.td;
        let symbol = match self.position {
            TapePosition::Finished => return None,
            TapePosition::Before => BLANK,
            TapePosition::Wall { wall, offset } => td.walls[wall][offset],
            TapePosition::Repeater {
                partition, offset, ..
            } => td.repeaters[partition][offset],
        };
        self.abs += 1;
        self.position = match self.position {
            TapePosition::Before if self.abs < i64::from(td.leftmost) => TapePosition::Before,
            TapePosition::Before => settle(td, TapePosition::Wall { wall: 0, offset: 0 }),
            TapePosition::Wall { wall, offset } => settle(
                td,
                TapePosition::Wall {
                    wall,
                    offset: offset + 1,
                },
            ),
            TapePosition::Repeater {
                partition,
                repeat,
                offset,
            } => settle(
                td,
                TapePosition::Repeater {
                    partition,
                    repeat,
                    offset: offset + 1,
                },
            ),
            TapePosition::Finished => TapePosition::Finished,
        };
        Some(symbol)
    }
}

impl Iterator for TapeWalker<'_> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        self.next_cell()
    }
}

/// Moves a position that ran off the end of its element onto the next
/// existing cell, skipping empty walls and exhausted blocks.
fn settle(td: &TapeDescriptor, mut position: TapePosition) -> TapePosition {
    loop {
        position = match position {
            TapePosition::Wall { wall, offset } if offset >= td.walls[wall].len() => {
                if wall < td.partitions() {
                    TapePosition::Repeater {
                        partition: wall,
                        repeat: 0,
                        offset: 0,
                    }
                } else {
                    TapePosition::Finished
                }
            }
            TapePosition::Repeater {
                partition,
                repeat,
                ..
            } if repeat >= td.counts[partition] || td.repeaters[partition].is_empty() => {
                TapePosition::Wall {
                    wall: partition + 1,
                    offset: 0,
                }
            }
            TapePosition::Repeater {
                partition,
                repeat,
                offset,
            } if offset >= td.repeaters[partition].len() => TapePosition::Repeater {
                partition,
                repeat: repeat + 1,
                offset: 0,
            },
            settled => return settled,
        };
    }
}
