use super::errors::{CheckError, RejectReason};
use crate::machine::{ConcreteTape, Symbol, TransitionTable, BLANK};
use crate::tape::{SegmentTransition, TapeContext};

/// Cumulative ceiling on simulated machine steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBudget {
    limit: u64,
    used: u64,
}

impl StepBudget {
    /// Budget allowing `limit` steps in total.
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    /// Steps charged so far.
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Charges `steps` before they are simulated.
    pub fn charge(&mut self, steps: u64) -> Result<(), CheckError> {
        let used = self.used.saturating_add(steps);
        if used > self.limit {
            return Err(CheckError::new(
                RejectReason::StepBudgetExceeded,
                format!("{used} steps exceed the ceiling of {}", self.limit),
            ));
        }
        self.used = used;
        Ok(())
    }
}

/// Concrete result of a verified simulation claim.
///
/// `initial_cells` and `final_cells` cover the window widened by the cells
/// the machine read outside `Initial`; they start at window-relative
/// position `-(read_left)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedWindow {
    /// Cells read left of the initial window.
    pub read_left: usize,
    /// Cells read right of the initial window.
    pub read_right: usize,
    /// Cells before the steps, blank where the window was widened.
    pub initial_cells: Vec<Symbol>,
    /// Cells after the steps.
    pub final_cells: Vec<Symbol>,
}

impl SimulatedWindow {
    /// Returns `true` when the machine read a cell outside `Initial`.
    pub fn has_excursion(&self) -> bool {
        self.read_left > 0 || self.read_right > 0
    }

    /// Window-relative position of the first widened cell.
    pub fn offset(&self) -> i64 {
        -(self.read_left as i64)
    }
}

fn mismatch(detail: String) -> CheckError {
    CheckError::new(RejectReason::SimulationMismatch, detail)
}

/// Replays `tr.steps` steps from `tr.initial`, reading blanks outside the
/// window, and checks the result against `tr.terminal`.
pub fn check_transition<M: TransitionTable + ?Sized>(
    machine: &M,
    tr: &SegmentTransition,
    steps: &mut StepBudget,
) -> Result<SimulatedWindow, CheckError> {
    tr.validate(&TapeContext::of(machine))?;
    steps.charge(u64::from(tr.steps))?;

    let initial = &tr.initial;
    let mut tape = ConcreteTape::from_window(
        initial.tape.clone(),
        0,
        i64::from(initial.head),
        initial.state,
    );
    if let Some(done) = tape.run(machine, u64::from(tr.steps)) {
        return Err(mismatch(format!(
            "machine halted after {done} of {} steps",
            tr.steps
        )));
    }

    let terminal = &tr.terminal;
    if tape.state() != terminal.state {
        return Err(mismatch(format!(
            "final state {} but segment claims {}",
            tape.state(),
            terminal.state
        )));
    }
    if tape.head() != i64::from(terminal.head) {
        return Err(mismatch(format!(
            "final head at {} but segment claims {}",
            tape.head(),
            terminal.head
        )));
    }
    let len = terminal.len() as i64;
    if let Some(position) = (0..len).find(|&p| Some(tape.cell_at(p)) != terminal.cell(p)) {
        return Err(mismatch(format!("final cell {position} differs")));
    }

    let (low, high) = tape.read_span().unwrap_or((0, 0));
    let read_left = (-low).max(0) as usize;
    let read_right = (high - (len - 1)).max(0) as usize;
    let window = -(read_left as i64)..len + read_right as i64;
    Ok(SimulatedWindow {
        read_left,
        read_right,
        initial_cells: window
            .clone()
            .map(|p| initial.cell(p).unwrap_or(BLANK))
            .collect(),
        final_cells: window.map(|p| tape.cell_at(p)).collect(),
    })
}
