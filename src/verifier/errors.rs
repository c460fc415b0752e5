use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ser::{SerError, SerKind};
use crate::tape::{DescriptorError, ExpandError};

/// Why a certificate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum RejectReason {
    /// A descriptor, segment or header failed a structural invariant.
    #[error("invariant violation")]
    InvariantViolation,
    /// Step-by-step simulation disagreed with a claimed final segment, or the
    /// machine halted early.
    #[error("simulation mismatch")]
    SimulationMismatch,
    /// A segment disagreed with the descriptor it claims to describe.
    #[error("segment mismatch")]
    SegmentMismatch,
    /// Adjacent transitions of a run disagreed on their overlap.
    #[error("follow-on mismatch")]
    FollowOnMismatch,
    /// A repeater sweep did not shift the head by exactly one period in an
    /// unchanged state.
    #[error("repeater shift violation")]
    RepeaterShiftViolation,
    /// Expansion would pass the configured ceiling.
    #[error("expansion ceiling exceeded")]
    ExpansionExceeded,
    /// The descriptor reached after the last run does not return to the
    /// initial tape.
    #[error("closure mismatch")]
    ClosureMismatch,
    /// A supplied after-image disagrees with the descriptor implied by the
    /// transition.
    #[error("after-image mismatch")]
    AfterImageMismatch,
    /// Cumulative simulation passed the configured step ceiling.
    #[error("step budget exceeded")]
    StepBudgetExceeded,
    /// The certificate bytes could not be decoded.
    #[error("malformed {0}")]
    Malformed(SerKind),
}

/// Failure of an individual check, with a human-readable detail line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}: {detail}")]
pub struct CheckError {
    /// Classified reason.
    pub reason: RejectReason,
    /// Diagnostic detail.
    pub detail: String,
}

impl CheckError {
    /// Creates a check error.
    pub fn new(reason: RejectReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }

    /// Shorthand for an invariant violation.
    pub fn invariant(detail: impl fmt::Display) -> Self {
        Self::new(RejectReason::InvariantViolation, detail.to_string())
    }
}

impl From<DescriptorError> for CheckError {
    fn from(err: DescriptorError) -> Self {
        CheckError::invariant(err)
    }
}

impl From<SerError> for CheckError {
    fn from(err: SerError) -> Self {
        CheckError::new(RejectReason::Malformed(err.kind()), err.to_string())
    }
}

/// Maps an expansion failure raised while aligning descriptors. Ceiling
/// violations keep their own reason; everything else means the descriptors
/// cannot be brought into agreement and is reported as `otherwise`.
pub(crate) fn expansion_error(err: ExpandError, otherwise: RejectReason) -> CheckError {
    match err {
        ExpandError::LimitExceeded { .. } => {
            CheckError::new(RejectReason::ExpansionExceeded, err.to_string())
        }
        ExpandError::Descriptor(inner) => CheckError::invariant(inner),
        other => CheckError::new(otherwise, other.to_string()),
    }
}

/// Rejection record emitted by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rejection {
    /// Classified reason.
    pub reason: RejectReason,
    /// Run that failed, `None` for header, initial tape and closure failures.
    pub run: Option<u32>,
    /// Transition inside the run, `None` when the failure is not tied to one.
    pub transition: Option<u32>,
    /// Diagnostic detail.
    pub detail: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)?;
        match (self.run, self.transition) {
            (Some(run), Some(transition)) => write!(f, " at run {run}, transition {transition}")?,
            (Some(run), None) => write!(f, " at run {run}")?,
            _ => {}
        }
        write!(f, ": {}", self.detail)
    }
}

impl std::error::Error for Rejection {}
