//! Verifier configuration and resource limits.
//!
//! The constants in this module bound every container read from a
//! certificate stream. Hosts that need different ceilings construct a
//! [`VerifierConfig`] directly or deserialize one (all types derive `serde`),
//! and pass it to [`crate::verifier::Verifier::new`].

use serde::{Deserialize, Serialize};

/// Largest number of repeater partitions a tape descriptor may carry.
pub const MAX_PARTITIONS: u32 = 8;

/// Largest number of runs a certificate may declare.
pub const MAX_RUNS: u32 = 500;

/// Ceiling on the cumulative number of cells moved by expansion operators
/// while verifying a single certificate.
pub const VERIF_INFO_MAX_LENGTH: u64 = 500_000;

/// Default ceiling on the cumulative number of simulated machine steps,
/// including the startup simulation.
pub const DEFAULT_MAX_STEPS: u64 = 50_000_000;

/// Largest alphabet a transition table may declare.
pub const MAX_SYMBOLS: u8 = 8;

/// Largest number of states a transition table may declare.
pub const MAX_STATES: u8 = 32;

/// Treatment of certificates whose declared type is `Bell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BellPolicy {
    /// Report an informational `Skipped` outcome.
    #[default]
    Skip,
    /// Reject the certificate with an invariant violation.
    Reject,
}

/// Bounds enforced while ingesting and checking a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierLimits {
    /// Maximum `nPartitions` accepted from the header.
    pub max_partitions: u32,
    /// Maximum `nRuns` accepted from the header.
    pub max_runs: u32,
    /// Cumulative expansion ceiling in cells.
    pub max_expansion: u64,
    /// Cumulative simulation ceiling in steps.
    pub max_steps: u64,
}

impl VerifierLimits {
    /// Returns a copy with the expansion ceiling replaced.
    pub fn with_max_expansion(mut self, cells: u64) -> Self {
        self.max_expansion = cells;
        self
    }

    /// Returns a copy with the step ceiling replaced.
    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = steps;
        self
    }
}

impl Default for VerifierLimits {
    fn default() -> Self {
        Self {
            max_partitions: MAX_PARTITIONS,
            max_runs: MAX_RUNS,
            max_expansion: VERIF_INFO_MAX_LENGTH,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Full verifier configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Resource ceilings.
    pub limits: VerifierLimits,
    /// Handling of `Bell` certificates.
    pub bell_policy: BellPolicy,
}

impl VerifierConfig {
    /// Configuration using the default limits and the given bell policy.
    pub fn with_bell_policy(bell_policy: BellPolicy) -> Self {
        Self {
            limits: VerifierLimits::default(),
            bell_policy,
        }
    }
}
