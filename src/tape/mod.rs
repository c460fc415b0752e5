//! Symbolic tapes.
//!
//! A [`TapeDescriptor`] describes a family of concrete tapes: literal walls
//! separated by repeater blocks, each block standing for a repeater repeated
//! `count` times. [`Segment`]s are finite concrete windows used by simulation
//! claims. This module provides the walker over descriptors, equivalence
//! checking, and the expansion and normalisation operators.

mod descriptor;
mod equivalence;
mod expand;
mod segment;
mod walker;

pub use descriptor::{DescriptorError, TapeDescriptor};
pub use equivalence::{check_cells_equal, check_tapes_equivalent, Mismatch};
pub use expand::{
    cover_left, cover_right, expand_tape_leftward, expand_tape_rightward, expand_wall_leftward,
    expand_wall_rightward, expand_walls_leftward, expand_walls_rightward, normalize,
    ExpandError, ExpansionBudget,
};
pub use segment::{Segment, SegmentTransition};
pub use walker::{locate, TapePosition, TapeWalker};

use serde::{Deserialize, Serialize};

use crate::machine::TransitionTable;

/// Alphabet and state bounds that every descriptor and segment must respect.
///
/// Descriptors carry no reference to the machine they belong to; the bounds
/// are passed explicitly to every validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeContext {
    /// Size of the tape alphabet.
    pub symbols: u8,
    /// Number of machine states.
    pub states: u8,
}

impl TapeContext {
    /// Creates a context from explicit bounds.
    pub const fn new(symbols: u8, states: u8) -> Self {
        Self { symbols, states }
    }

    /// Bounds of a transition table.
    pub fn of<M: TransitionTable + ?Sized>(machine: &M) -> Self {
        Self::new(machine.symbols(), machine.states())
    }
}
