use serde::{Deserialize, Serialize};

use super::{DescriptorError, TapeContext};
use crate::machine::{Symbol, TmState};

/// A finite window of tape with a state and a head position relative to the
/// first cell of the window.
///
/// The head of an initial segment lies inside the window. A final segment may
/// park its head one cell past either edge (`-1` or `tape.len()`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Cell contents.
    pub tape: Vec<Symbol>,
    /// Machine state.
    pub state: TmState,
    /// Head position relative to `tape[0]`.
    pub head: i32,
}

impl Segment {
    /// Builds a segment.
    pub fn new(tape: Vec<Symbol>, state: TmState, head: i32) -> Self {
        Self { tape, state, head }
    }

    /// Number of cells in the window.
    pub fn len(&self) -> usize {
        self.tape.len()
    }

    /// Returns `true` for an empty window.
    pub fn is_empty(&self) -> bool {
        self.tape.is_empty()
    }

    /// Cell at a window-relative position, `None` outside the window.
    pub fn cell(&self, position: i64) -> Option<Symbol> {
        usize::try_from(position)
            .ok()
            .and_then(|index| self.tape.get(index).copied())
    }

    fn validate_cells(&self, context: &TapeContext) -> Result<(), DescriptorError> {
        if self.tape.is_empty() {
            return Err(DescriptorError::EmptySegment);
        }
        if let Some(&symbol) = self.tape.iter().find(|&&s| s >= context.symbols) {
            return Err(DescriptorError::SymbolOutOfRange { symbol });
        }
        if self.state >= context.states {
            return Err(DescriptorError::StateOutOfRange { state: self.state });
        }
        Ok(())
    }
}

/// A simulation claim: running `steps` steps from `initial` yields `terminal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentTransition {
    /// Number of machine steps.
    pub steps: u32,
    /// Window before the steps.
    pub initial: Segment,
    /// Window after the steps.
    pub terminal: Segment,
}

impl SegmentTransition {
    /// Checks the shape rules shared by every transition kind: non-empty
    /// windows of equal length, alphabet and state bounds, and head
    /// placement.
    pub fn validate(&self, context: &TapeContext) -> Result<(), DescriptorError> {
        self.initial.validate_cells(context)?;
        self.terminal.validate_cells(context)?;
        if self.initial.len() != self.terminal.len() {
            return Err(DescriptorError::SegmentLengthMismatch {
                initial: self.initial.len(),
                terminal: self.terminal.len(),
            });
        }
        let len = self.initial.len() as i64;
        let head = i64::from(self.initial.head);
        if !(0..len).contains(&head) {
            return Err(DescriptorError::SegmentHeadOutOfRange { head: self.initial.head });
        }
        let head = i64::from(self.terminal.head);
        if !(-1..=len).contains(&head) {
            return Err(DescriptorError::SegmentHeadOutOfRange {
                head: self.terminal.head,
            });
        }
        Ok(())
    }
}
