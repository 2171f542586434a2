//! Portable lane-by-lane versions of the SIMD kernels, used when the CPU has neither
//! `avx512f` nor `avx2`, or when the scalar backend was forced.

use super::aligned_block::SIMD_LANECOUNT;

pub(super) type Lanes = [f32; SIMD_LANECOUNT];

#[inline]
pub(super) fn splat(value: f32) -> Lanes {
    [value; SIMD_LANECOUNT]
}

#[inline]
pub(super) fn add(a: &Lanes, b: &Lanes) -> Lanes {
    std::array::from_fn(|i| a[i] + b[i])
}

/// Reads the first 16 values of `src`.
#[inline]
pub(super) fn load(src: &[f32]) -> Lanes {
    let mut lanes = [0.0; SIMD_LANECOUNT];
    lanes.copy_from_slice(&src[..SIMD_LANECOUNT]);
    lanes
}

/// Reads all of `src` (at most 16 values) and zeroes the remaining lanes.
#[inline]
pub(super) fn load_partial(src: &[f32]) -> Lanes {
    let mut lanes = [0.0; SIMD_LANECOUNT];
    lanes[..src.len()].copy_from_slice(src);
    lanes
}

/// Writes the first `dst.len()` lanes (at most 16).
#[inline]
pub(super) fn store_partial(dst: &mut [f32], lanes: &Lanes) {
    let len = dst.len();
    dst.copy_from_slice(&lanes[..len]);
}
