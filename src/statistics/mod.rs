//! Kernel call counters for slice-level additions.
//!
//! [`Stats`] records how many full 16-lane kernels and masked tail kernels a run used.

mod stats;
pub use stats::*;
