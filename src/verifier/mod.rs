//! Certificate checks and the verification driver.
//!
//! Every check returns `Result<_, CheckError>`; the [`Verifier`] attaches the
//! run and transition that failed and turns the first error into an
//! [`Outcome::Rejected`].

mod closure;
mod driver;
mod errors;
mod repeater;
mod segment;
mod stats;
mod transition;
mod wall;

pub use closure::{check_closure, check_initial_tape};
pub use driver::{Outcome, SkipReason, Verifier, VerifySummary};
pub use errors::{CheckError, RejectReason, Rejection};
pub use repeater::{check_leftward_repeater, check_repeater_transition, check_rightward_repeater};
pub use segment::{check_follow_on, check_segment};
pub use stats::{Extreme, VerifierStats};
pub use transition::{check_transition, SimulatedWindow, StepBudget};
pub use wall::check_wall_transition;

use crate::config::VerifierLimits;
use crate::tape::ExpansionBudget;

/// Resource budgets shared by every check of one certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    /// Simulated machine steps.
    pub steps: StepBudget,
    /// Cells moved by expansion operators.
    pub expansion: ExpansionBudget,
}

impl Budgets {
    /// Fresh budgets sized by `limits`.
    pub fn from_limits(limits: &VerifierLimits) -> Self {
        Self {
            steps: StepBudget::new(limits.max_steps),
            expansion: ExpansionBudget::new(limits.max_expansion),
        }
    }
}
