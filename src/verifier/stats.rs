use serde::{Deserialize, Serialize};

use super::driver::{Outcome, VerifySummary};
use crate::certificate::BouncerType;

/// A maximum or minimum together with the machine that attains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extreme {
    /// The extreme value.
    pub value: u64,
    /// Machine attaining it; the smallest identifier wins ties.
    pub machine_id: u32,
}

impl Extreme {
    fn keep(current: &mut Option<Extreme>, candidate: Extreme, better: fn(u64, u64) -> bool) {
        let replace = match current {
            Some(held) => {
                better(candidate.value, held.value)
                    || (candidate.value == held.value && candidate.machine_id < held.machine_id)
            }
            None => true,
        };
        if replace {
            *current = Some(candidate);
        }
    }

    fn keep_max(current: &mut Option<Extreme>, candidate: Extreme) {
        Self::keep(current, candidate, |a, b| a > b)
    }

    fn keep_min(current: &mut Option<Extreme>, candidate: Extreme) {
        Self::keep(current, candidate, |a, b| a < b)
    }
}

/// Aggregate counters over a batch of verification outcomes.
///
/// Only verified certificates contribute to the type counters and extremes;
/// rejected and skipped ones are counted but not classified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierStats {
    pub verified: u64,
    pub rejected: u64,
    pub skipped: u64,
    pub unilateral: u64,
    pub bilateral: u64,
    pub translated: u64,
    pub bells: u64,
    /// Verified certificates with exactly two runs.
    pub double: u64,
    /// Verified certificates with more than two runs.
    pub multiple: u64,
    /// Verified certificates with more than one partition.
    pub partitioned: u64,
    pub max_repeater_period: Option<Extreme>,
    pub max_runs: Option<Extreme>,
    pub min_steps: Option<Extreme>,
    pub max_steps: Option<Extreme>,
}

impl VerifierStats {
    /// Folds one outcome into the counters.
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Verified(summary) => self.record_verified(summary),
            Outcome::Rejected(_) => self.rejected += 1,
            Outcome::Skipped(_) => {
                self.skipped += 1;
                self.bells += 1;
            }
        }
    }

    fn record_verified(&mut self, summary: &VerifySummary) {
        self.verified += 1;
        match summary.bouncer_type {
            BouncerType::Unilateral => self.unilateral += 1,
            BouncerType::Bilateral => self.bilateral += 1,
            BouncerType::Translated => self.translated += 1,
            BouncerType::Bell => self.bells += 1,
        }
        match summary.runs {
            2 => self.double += 1,
            runs if runs > 2 => self.multiple += 1,
            _ => {}
        }
        if summary.partitions > 1 {
            self.partitioned += 1;
        }
        let id = summary.machine_id;
        let at = |value: u64| Extreme {
            value,
            machine_id: id,
        };
        Extreme::keep_max(
            &mut self.max_repeater_period,
            at(summary.max_repeater_period as u64),
        );
        Extreme::keep_max(&mut self.max_runs, at(u64::from(summary.runs)));
        Extreme::keep_min(&mut self.min_steps, at(summary.simulated_steps));
        Extreme::keep_max(&mut self.max_steps, at(summary.simulated_steps));
    }

    /// Combines counters gathered over disjoint batches.
    pub fn merge(&mut self, other: &VerifierStats) {
        self.verified += other.verified;
        self.rejected += other.rejected;
        self.skipped += other.skipped;
        self.unilateral += other.unilateral;
        self.bilateral += other.bilateral;
        self.translated += other.translated;
        self.bells += other.bells;
        self.double += other.double;
        self.multiple += other.multiple;
        self.partitioned += other.partitioned;
        let pairs = [
            (&mut self.max_repeater_period, other.max_repeater_period, true),
            (&mut self.max_runs, other.max_runs, true),
            (&mut self.min_steps, other.min_steps, false),
            (&mut self.max_steps, other.max_steps, true),
        ];
        for (mine, theirs, maximum) in pairs {
            let Some(theirs) = theirs else { continue };
            if maximum {
                Extreme::keep_max(mine, theirs);
            } else {
                Extreme::keep_min(mine, theirs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::driver::SkipReason;

    fn summary(machine_id: u32, runs: u32, steps: u64) -> VerifySummary {
        VerifySummary {
            machine_id,
            bouncer_type: BouncerType::Bilateral,
            partitions: 2,
            runs,
            transitions: 4,
            simulated_steps: steps,
            expanded_cells: 0,
            max_repeater_period: 1,
            digest: None,
        }
    }

    #[test]
    fn extremes_prefer_the_smaller_machine_on_ties() {
        let mut stats = VerifierStats::default();
        stats.record(&Outcome::Verified(summary(9, 2, 40)));
        stats.record(&Outcome::Verified(summary(3, 3, 40)));
        stats.record(&Outcome::Verified(summary(5, 3, 10)));
        assert_eq!(stats.verified, 3);
        assert_eq!((stats.double, stats.multiple, stats.partitioned), (1, 2, 3));
        assert_eq!(stats.max_steps, Some(Extreme { value: 40, machine_id: 3 }));
        assert_eq!(stats.min_steps, Some(Extreme { value: 10, machine_id: 5 }));
        assert_eq!(stats.max_runs, Some(Extreme { value: 3, machine_id: 3 }));
        assert_eq!(stats.max_repeater_period.map(|e| e.machine_id), Some(3));
    }

    #[test]
    fn merge_matches_sequential_recording() {
        let outcomes = [
            Outcome::Verified(summary(7, 1, 12)),
            Outcome::Skipped(SkipReason::Bell),
            Outcome::Verified(summary(2, 4, 12)),
        ];
        let mut sequential = VerifierStats::default();
        outcomes.iter().for_each(|o| sequential.record(o));

        let mut left = VerifierStats::default();
        left.record(&outcomes[0]);
        let mut right = VerifierStats::default();
        right.record(&outcomes[1]);
        right.record(&outcomes[2]);
        left.merge(&right);
        assert_eq!(left, sequential);
        assert_eq!(left.bells, 1);
    }
}
