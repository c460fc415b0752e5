use serde::{Deserialize, Serialize};

use crate::certificate::Certificate;
use crate::config::VerifierConfig;
use crate::machine::TransitionTable;
use crate::verifier::{Outcome, Verifier, VerifierStats};

/// Outcomes of a batch, in input order, with their aggregate statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
    pub stats: VerifierStats,
}

fn verify_one<M: TransitionTable>(job: &(M, Certificate), config: &VerifierConfig) -> Outcome {
    Verifier::new(&job.0, *config).verify(&job.1)
}

fn tally<'a>(outcomes: impl Iterator<Item = &'a Outcome>) -> VerifierStats {
    let mut stats = VerifierStats::default();
    outcomes.for_each(|outcome| stats.record(outcome));
    stats
}

/// Verifies independent `(machine, certificate)` jobs.
///
/// With the `parallel` feature enabled and switched on, jobs are spread over
/// the rayon pool and per-task statistics are merged at the end. The report
/// is identical either way.
pub fn verify_batch<M>(jobs: &[(M, Certificate)], config: &VerifierConfig) -> BatchReport
where
    M: TransitionTable + Sync,
{
    #[cfg(feature = "parallel")]
    {
        if super::parallelism_enabled() {
            return verify_on_pool(jobs, config);
        }
    }
    let outcomes: Vec<Outcome> = jobs.iter().map(|job| verify_one(job, config)).collect();
    BatchReport {
        stats: tally(outcomes.iter()),
        outcomes,
    }
}

#[cfg(feature = "parallel")]
fn verify_on_pool<M>(jobs: &[(M, Certificate)], config: &VerifierConfig) -> BatchReport
where
    M: TransitionTable + Sync,
{
    use rayon::prelude::*;

    let chunk = super::preferred_chunk_size(jobs.len());
    let outcomes: Vec<Outcome> = jobs
        .par_iter()
        .with_min_len(chunk)
        .with_max_len(chunk)
        .map(|job| verify_one(job, config))
        .collect();
    let stats = outcomes
        .par_chunks(chunk)
        .map(|part| tally(part.iter()))
        .reduce(VerifierStats::default, |mut left, right| {
            left.merge(&right);
            left
        });
    BatchReport { outcomes, stats }
}
