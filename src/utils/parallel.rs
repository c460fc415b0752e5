//! Switch between the sequential and the rayon path of
//! [`verify_batch`](super::verify_batch).
//!
//! The switch is process-wide and starts on. It only has an effect when the
//! crate is built with the `parallel` feature; tests flip it with
//! [`set_parallelism`] to run both paths over the same jobs.

use std::sync::atomic::{AtomicBool, Ordering};

static PARALLEL: AtomicBool = AtomicBool::new(true);

/// Upper bound on the certificates one rayon task verifies.
const MAX_JOBS_PER_TASK: usize = 16;

/// Returns `true` when batches go through the rayon pool.
pub fn parallelism_enabled() -> bool {
    cfg!(feature = "parallel") && PARALLEL.load(Ordering::Acquire)
}

/// Certificates per rayon task for a batch of `jobs`.
pub fn preferred_chunk_size(jobs: usize) -> usize {
    jobs.clamp(1, MAX_JOBS_PER_TASK)
}

/// Turns the rayon path on or off until the returned guard is dropped.
pub fn set_parallelism(enabled: bool) -> ParallelismGuard {
    ParallelismGuard {
        previous: PARALLEL.swap(enabled, Ordering::AcqRel),
    }
}

/// Puts the previous setting back on drop.
#[derive(Debug)]
#[must_use = "the setting is restored as soon as the guard is dropped"]
pub struct ParallelismGuard {
    previous: bool,
}

impl Drop for ParallelismGuard {
    fn drop(&mut self) {
        PARALLEL.store(self.previous, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_are_never_empty_or_oversized() {
        assert_eq!(preferred_chunk_size(0), 1);
        assert_eq!(preferred_chunk_size(5), 5);
        assert_eq!(preferred_chunk_size(1_000), MAX_JOBS_PER_TASK);
    }

    #[test]
    fn guard_restores_the_previous_setting() {
        let before = PARALLEL.load(Ordering::Acquire);
        {
            let _off = set_parallelism(false);
            assert!(!parallelism_enabled());
            {
                let _on = set_parallelism(true);
                assert_eq!(parallelism_enabled(), cfg!(feature = "parallel"));
            }
            assert!(!parallelism_enabled());
        }
        assert_eq!(PARALLEL.load(Ordering::Acquire), before);
    }
}
