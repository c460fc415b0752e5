use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::walker::{locate, TapePosition};
use super::TapeContext;
use crate::machine::{Symbol, TmState, BLANK};

/// Structural violations of a tape descriptor or segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("{walls} walls, {repeaters} repeaters and {counts} counts do not describe one partition layout")]
    ShapeMismatch {
        walls: usize,
        repeaters: usize,
        counts: usize,
    },
    #[error("repeater {partition} is empty")]
    EmptyRepeater { partition: usize },
    #[error("repeater {partition} has a zero count")]
    ZeroCount { partition: usize },
    #[error("head wall {head_wall} is out of range for {partitions} partitions")]
    HeadWallOutOfRange { head_wall: u32, partitions: usize },
    #[error("head offset {offset} lies outside wall {head_wall} of length {len}")]
    HeadOffsetOutOfRange {
        head_wall: u32,
        offset: i32,
        len: usize,
    },
    #[error("rightmost {rightmost} disagrees with leftmost {leftmost} and length {len}")]
    WindowMismatch {
        leftmost: i32,
        rightmost: i32,
        len: u64,
    },
    #[error("symbol {symbol} is outside the alphabet")]
    SymbolOutOfRange { symbol: Symbol },
    #[error("state {state} is out of range")]
    StateOutOfRange { state: TmState },
    #[error("segment window is empty")]
    EmptySegment,
    #[error("initial window has {initial} cells, final window has {terminal}")]
    SegmentLengthMismatch { initial: usize, terminal: usize },
    #[error("segment head {head} is outside the window")]
    SegmentHeadOutOfRange { head: i32 },
    #[error("coordinate overflow")]
    CoordinateOverflow,
}

/// Symbolic description of a family of tapes:
///
/// `Wall[0] · Repeater[0]^Count[0] · Wall[1] · … · Repeater[P-1]^Count[P-1] · Wall[P]`
///
/// laid out from the absolute coordinate `leftmost`. Cells outside
/// `[leftmost, rightmost]` are blank. The head always sits on a wall cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TapeDescriptor {
    /// `P + 1` walls; only the head wall must be non-empty.
    pub walls: Vec<Vec<Symbol>>,
    /// `P` non-empty repeater blocks.
    pub repeaters: Vec<Vec<Symbol>>,
    /// `P` positive repetition counts.
    pub counts: Vec<u32>,
    /// Machine state.
    pub state: TmState,
    /// Absolute coordinate of the first cell of `Wall[0]`.
    pub leftmost: i32,
    /// Absolute coordinate of the last cell of `Wall[P]`.
    pub rightmost: i32,
    /// Index of the wall holding the head.
    pub head_wall: u32,
    /// Head offset inside `walls[head_wall]`.
    pub head_offset: i32,
}

impl TapeDescriptor {
    /// A descriptor with no partitions: a single wall holding `cells`.
    pub fn single_wall(
        cells: Vec<Symbol>,
        leftmost: i32,
        head_offset: i32,
        state: TmState,
    ) -> Result<Self, DescriptorError> {
        let len = i32::try_from(cells.len()).map_err(|_| DescriptorError::CoordinateOverflow)?;
        let rightmost = leftmost
            .checked_add(len - 1)
            .ok_or(DescriptorError::CoordinateOverflow)?;
        Ok(Self {
            walls: vec![cells],
            repeaters: Vec::new(),
            counts: Vec::new(),
            state,
            leftmost,
            rightmost,
            head_wall: 0,
            head_offset,
        })
    }

    /// Number of partitions `P`.
    pub fn partitions(&self) -> usize {
        self.repeaters.len()
    }

    /// Number of cells described, `Σ|Wall| + Σ Count·|Repeater|`.
    pub fn total_len(&self) -> u64 {
        let walls: u64 = self.walls.iter().map(|w| w.len() as u64).sum();
        let blocks: u64 = self
            .repeaters
            .iter()
            .zip(&self.counts)
            .map(|(r, &c)| r.len() as u64 * u64::from(c))
            .sum();
        walls + blocks
    }

    /// Number of cells in the repeater block of partition `i`.
    pub fn block_len(&self, partition: usize) -> u64 {
        self.repeaters[partition].len() as u64 * u64::from(self.counts[partition])
    }

    /// Absolute coordinate of the first cell of `walls[w]`.
    pub fn wall_start(&self, wall: usize) -> i64 {
        let mut position = i64::from(self.leftmost);
        for index in 0..wall {
            position += self.walls[index].len() as i64 + self.block_len(index) as i64;
        }
        position
    }

    /// Absolute coordinate one past the last cell of `walls[w]`.
    pub fn wall_end(&self, wall: usize) -> i64 {
        self.wall_start(wall) + self.walls[wall].len() as i64
    }

    /// Absolute head coordinate.
    pub fn head_abs(&self) -> i64 {
        self.wall_start(self.head_wall as usize) + i64::from(self.head_offset)
    }

    /// Symbol at an absolute coordinate, blank outside the described window.
    pub fn cell_at(&self, position: i64) -> Symbol {
        match locate(self, position) {
            TapePosition::Wall { wall, offset } => self.walls[wall][offset],
            TapePosition::Repeater {
                partition, offset, ..
            } => self.repeaters[partition][offset],
            TapePosition::Before | TapePosition::Finished => BLANK,
        }
    }

    /// Reads `len` cells starting at the absolute coordinate `start`.
    pub fn read_window(&self, start: i64, len: usize) -> Vec<Symbol> {
        let mut out = Vec::with_capacity(len);
        let mut cells = super::TapeWalker::seek(self, start);
        for _ in 0..len {
            out.push(cells.next().unwrap_or(BLANK));
        }
        out
    }

    /// Checks the structural invariants: layout shape, non-empty repeaters,
    /// positive counts, the head on a wall cell, `rightmost` consistent with
    /// the total length, and symbols and state within the context bounds.
    pub fn validate(&self, context: &TapeContext) -> Result<(), DescriptorError> {
        let partitions = self.repeaters.len();
        if self.walls.len() != partitions + 1 || self.counts.len() != partitions {
            return Err(DescriptorError::ShapeMismatch {
                walls: self.walls.len(),
                repeaters: partitions,
                counts: self.counts.len(),
            });
        }
        for (partition, (repeater, &count)) in self.repeaters.iter().zip(&self.counts).enumerate()
        {
            if repeater.is_empty() {
                return Err(DescriptorError::EmptyRepeater { partition });
            }
            if count == 0 {
                return Err(DescriptorError::ZeroCount { partition });
            }
        }
        let head_wall = self.head_wall as usize;
        let Some(wall) = self.walls.get(head_wall) else {
            return Err(DescriptorError::HeadWallOutOfRange {
                head_wall: self.head_wall,
                partitions,
            });
        };
        if self.head_offset < 0 || self.head_offset as usize >= wall.len() {
            return Err(DescriptorError::HeadOffsetOutOfRange {
                head_wall: self.head_wall,
                offset: self.head_offset,
                len: wall.len(),
            });
        }
        let len = self.total_len();
        if i64::from(self.rightmost) != i64::from(self.leftmost) + len as i64 - 1 {
            return Err(DescriptorError::WindowMismatch {
                leftmost: self.leftmost,
                rightmost: self.rightmost,
                len,
            });
        }
        let mut symbols = self.walls.iter().chain(&self.repeaters).flatten();
        if let Some(&symbol) = symbols.find(|&&s| s >= context.symbols) {
            return Err(DescriptorError::SymbolOutOfRange { symbol });
        }
        if self.state >= context.states {
            return Err(DescriptorError::StateOutOfRange { state: self.state });
        }
        Ok(())
    }

    pub(crate) fn set_window(&mut self, leftmost: i64) -> Result<(), DescriptorError> {
        let rightmost = leftmost + self.total_len() as i64 - 1;
        self.leftmost = i32::try_from(leftmost).map_err(|_| DescriptorError::CoordinateOverflow)?;
        self.rightmost =
            i32::try_from(rightmost).map_err(|_| DescriptorError::CoordinateOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_partitions() -> TapeDescriptor {
        TapeDescriptor {
            walls: vec![vec![0], vec![2], vec![0, 1]],
            repeaters: vec![vec![1, 0], vec![1]],
            counts: vec![2, 3],
            state: 1,
            leftmost: -3,
            rightmost: 7,
            head_wall: 1,
            head_offset: 0,
        }
    }

    #[test]
    fn layout_coordinates() {
        let td = two_partitions();
        assert_eq!(td.total_len(), 11);
        assert_eq!(td.wall_start(0), -3);
        assert_eq!(td.wall_start(1), 2);
        assert_eq!(td.wall_start(2), 6);
        assert_eq!(td.wall_end(2), 8);
        assert_eq!(td.head_abs(), 2);
    }

    #[test]
    fn cells_and_windows() {
        let td = two_partitions();
        assert_eq!(td.cell_at(-4), BLANK);
        assert_eq!(td.cell_at(-2), 1);
        assert_eq!(td.cell_at(-1), 0);
        assert_eq!(td.cell_at(2), 2);
        assert_eq!(td.cell_at(7), 1);
        assert_eq!(td.read_window(-5, 6), vec![0, 0, 0, 1, 0, 1]);
        assert_eq!(td.read_window(6, 4), vec![0, 1, 0, 0]);
    }

    #[test]
    fn validate_reports_window_mismatch() {
        let context = TapeContext::new(3, 2);
        let mut td = two_partitions();
        assert_eq!(td.validate(&context), Ok(()));
        td.rightmost = 6;
        assert_eq!(
            td.validate(&context),
            Err(DescriptorError::WindowMismatch {
                leftmost: -3,
                rightmost: 6,
                len: 11,
            })
        );
        assert!(matches!(
            td.validate(&TapeContext::new(2, 2)),
            Err(DescriptorError::WindowMismatch { .. })
        ));
    }

    #[test]
    fn validate_rejects_head_off_wall() {
        let context = TapeContext::new(3, 2);
        let mut td = two_partitions();
        td.head_offset = 1;
        assert!(matches!(
            td.validate(&context),
            Err(DescriptorError::HeadOffsetOutOfRange { .. })
        ));
        td.head_offset = 0;
        td.counts[1] = 0;
        assert_eq!(
            td.validate(&context),
            Err(DescriptorError::ZeroCount { partition: 1 })
        );
    }
}
