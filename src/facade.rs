//! Free-function entry points for callers that do not want to touch [`F32x16`] methods.

use crate::numerics::{AlignedBlock, F32x16};

pub use crate::numerics::add_scalars;

/// All 16 lanes set to `value`.
#[inline]
pub fn broadcast(value: f32) -> F32x16 {
    F32x16::splat(value)
}

/// Unaligned load of `buffer[0..16]`.
///
/// # Panics
///
/// Panics if `buffer` holds fewer than 16 values.
#[inline]
pub fn load(buffer: &[f32]) -> F32x16 {
    F32x16::load(buffer)
}

#[inline]
pub fn add(a: F32x16, b: F32x16) -> F32x16 {
    a + b
}

/// Aligned store of all 16 lanes of `a`.
#[inline]
pub fn store(buffer: &mut AlignedBlock, a: F32x16) {
    a.store(buffer)
}
