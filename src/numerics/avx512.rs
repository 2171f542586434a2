//! AVX-512F kernels, one intrinsic each.
//!
//! # Safety
//!
//! Every function requires the running CPU to support `avx512f`. Callers go through
//! [`Isa::active`](super::Isa::active), which only reports [`Isa::Avx512`](super::Isa::Avx512)
//! after runtime detection.

use std::arch::x86_64::{
    __m512, __mmask16, _mm512_add_ps, _mm512_load_ps, _mm512_loadu_ps, _mm512_mask_storeu_ps,
    _mm512_maskz_loadu_ps, _mm512_set1_ps, _mm512_store_ps, _mm512_storeu_ps,
};

use super::aligned_block::SIMD_LANECOUNT;

/// Mask with the low `len` lanes set.
#[inline(always)]
fn lane_mask(len: usize) -> __mmask16 {
    debug_assert!(len <= SIMD_LANECOUNT);
    ((1u32 << len) - 1) as __mmask16
}

#[inline]
#[target_feature(enable = "avx512f")]
pub(super) fn splat(value: f32) -> __m512 {
    _mm512_set1_ps(value)
}

#[inline]
#[target_feature(enable = "avx512f")]
pub(super) fn add(a: __m512, b: __m512) -> __m512 {
    _mm512_add_ps(a, b)
}

/// `ptr` must be valid for 16 reads. No alignment needed.
#[inline]
#[target_feature(enable = "avx512f")]
pub(super) unsafe fn loadu(ptr: *const f32) -> __m512 {
    unsafe { _mm512_loadu_ps(ptr) }
}

/// `ptr` must be valid for 16 reads and 64-byte aligned.
#[inline]
#[target_feature(enable = "avx512f")]
pub(super) unsafe fn load(ptr: *const f32) -> __m512 {
    unsafe { _mm512_load_ps(ptr) }
}

/// `ptr` must be valid for `len` reads. Lanes past `len` are zeroed and never touched
/// in memory.
#[inline]
#[target_feature(enable = "avx512f")]
pub(super) unsafe fn maskz_loadu(ptr: *const f32, len: usize) -> __m512 {
    unsafe { _mm512_maskz_loadu_ps(lane_mask(len), ptr) }
}

/// `ptr` must be valid for 16 writes and 64-byte aligned.
#[inline]
#[target_feature(enable = "avx512f")]
pub(super) unsafe fn store(ptr: *mut f32, a: __m512) {
    unsafe { _mm512_store_ps(ptr, a) }
}

/// `ptr` must be valid for 16 writes. No alignment needed.
#[inline]
#[target_feature(enable = "avx512f")]
pub(super) unsafe fn storeu(ptr: *mut f32, a: __m512) {
    unsafe { _mm512_storeu_ps(ptr, a) }
}

/// `ptr` must be valid for `len` writes. Memory past `len` is left untouched.
#[inline]
#[target_feature(enable = "avx512f")]
pub(super) unsafe fn mask_storeu(ptr: *mut f32, len: usize, a: __m512) {
    unsafe { _mm512_mask_storeu_ps(ptr, lane_mask(len), a) }
}
