//! Host-side helpers: batch verification and the switch for its optional
//! rayon path.

mod batch;
mod parallel;

pub use batch::{verify_batch, BatchReport};
pub use parallel::{parallelism_enabled, preferred_chunk_size, set_parallelism, ParallelismGuard};
