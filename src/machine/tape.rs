use std::collections::VecDeque;

use super::{NextState, Symbol, TmState, TransitionTable, BLANK};

/// Result of executing a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The machine moved and continues in a regular state.
    Continue,
    /// The machine reached an undefined entry or a halting transition.
    Halted,
}

/// A finite window of tape that grows with blank cells whenever the head
/// leaves it.
///
/// Coordinates are absolute: `origin` is the coordinate of the first stored
/// cell. The window never shrinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteTape {
    cells: VecDeque<Symbol>,
    origin: i64,
    head: i64,
    state: TmState,
    read_span: Option<(i64, i64)>,
}

impl ConcreteTape {
    /// A blank tape with the head at coordinate `0` in the start state.
    pub fn blank() -> Self {
        Self::from_window(vec![BLANK], 0, 0, 0)
    }

    /// A tape holding `cells` from coordinate `origin`, with the head at the
    /// absolute coordinate `head`.
    pub fn from_window(cells: Vec<Symbol>, origin: i64, head: i64, state: TmState) -> Self {
        let mut tape = Self {
            cells: cells.into(),
            origin,
            head,
            state,
            read_span: None,
        };
        tape.cover_head();
        tape
    }

    /// Absolute head coordinate.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Current state.
    pub fn state(&self) -> TmState {
        self.state
    }

    /// Coordinate of the first stored cell.
    pub fn leftmost(&self) -> i64 {
        self.origin
    }

    /// Coordinate of the last stored cell.
    pub fn rightmost(&self) -> i64 {
        self.origin + self.cells.len() as i64 - 1
    }

    /// Smallest and largest coordinates read by a step so far. A cell the
    /// head merely moved onto at the end is not included.
    pub fn read_span(&self) -> Option<(i64, i64)> {
        self.read_span
    }

    /// Symbol at an absolute coordinate (blank outside the stored window).
    pub fn cell_at(&self, position: i64) -> Symbol {
        let index = position - self.origin;
        if index < 0 {
            return BLANK;
        }
        self.cells.get(index as usize).copied().unwrap_or(BLANK)
    }

    /// Stored cells from `leftmost` to `rightmost`.
    pub fn cells(&self) -> Vec<Symbol> {
        self.cells.iter().copied().collect()
    }

    /// Executes one step of `machine`.
    pub fn step<M: TransitionTable + ?Sized>(&mut self, machine: &M) -> StepOutcome {
        let index = (self.head - self.origin) as usize;
        self.read_span = Some(match self.read_span {
            Some((low, high)) => (low.min(self.head), high.max(self.head)),
            None => (self.head, self.head),
        });
        let Some(transition) = machine.lookup(self.state, self.cells[index]) else {
            return StepOutcome::Halted;
        };
        self.cells[index] = transition.write;
        self.head += transition.direction.delta();
        self.cover_head();
        match transition.next {
            NextState::Goto(next) => {
                self.state = next;
                StepOutcome::Continue
            }
            NextState::Halt => StepOutcome::Halted,
        }
    }

    /// Executes up to `steps` steps. Returns the number of steps completed
    /// before the machine halted, or `None` when every step ran.
    pub fn run<M: TransitionTable + ?Sized>(&mut self, machine: &M, steps: u64) -> Option<u64> {
        for completed in 0..steps {
            if self.step(machine) == StepOutcome::Halted {
                return Some(completed);
            }
        }
        None
    }

    fn cover_head(&mut self) {
        while self.head < self.origin {
            self.cells.push_front(BLANK);
            self.origin -= 1;
        }
        while self.head > self.rightmost() {
            self.cells.push_back(BLANK);
        }
    }
}
