//! Turing-machine primitive used by the verifier.
//!
//! The verifier never enumerates or classifies machines; it only needs to
//! look up a transition for a `(state, symbol)` pair and to run a machine on a
//! concrete tape. [`TransitionTable`] is the seam for that lookup and
//! [`Machine`] is the table-driven implementation, parsed from the usual
//! `1RB1LC_1RC1RB_...` text format.

mod table;
mod tape;

pub use table::{Direction, Machine, MachineError, NextState, Transition, TransitionTable};
pub use tape::{ConcreteTape, StepOutcome};

/// A tape symbol. The blank symbol is `0`.
pub type Symbol = u8;

/// A machine state index. State `0` is the start state.
pub type TmState = u8;

/// The blank tape symbol.
pub const BLANK: Symbol = 0;
