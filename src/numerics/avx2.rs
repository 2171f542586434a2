//! AVX2 kernels. A 16-lane vector is handled as two `__m256` halves of 8 lanes, low half
//! first, so the value still travels as one `__m512` between calls.
//!
//! # Safety
//!
//! Every function requires the running CPU to support `avx2`. Callers go through
//! [`Isa::active`](super::Isa::active), which only reports [`Isa::Avx2`](super::Isa::Avx2)
//! after runtime detection.

use std::arch::x86_64::{
    __m256, __m256i, __m512, _mm256_add_ps, _mm256_cmpgt_epi32, _mm256_load_ps,
    _mm256_loadu_ps, _mm256_maskload_ps, _mm256_maskstore_ps, _mm256_set1_epi32,
    _mm256_set1_ps, _mm256_setr_epi32, _mm256_setzero_ps, _mm256_store_ps, _mm256_storeu_ps,
};

const HALF: usize = 8;

type Halves = [__m256; 2];

#[inline(always)]
fn join(halves: Halves) -> __m512 {
    // SAFETY: two `__m256` and one `__m512` are the same 64 bytes of packed f32.
    unsafe { std::mem::transmute::<Halves, __m512>(halves) }
}

#[inline(always)]
fn split(register: __m512) -> Halves {
    // SAFETY: see `join`.
    unsafe { std::mem::transmute::<__m512, Halves>(register) }
}

/// Lanes `0..len` (capped at 8) get their sign bit set, which is what maskload/maskstore read.
#[inline]
#[target_feature(enable = "avx2")]
fn half_mask(len: usize) -> __m256i {
    let len = len.min(HALF) as i32;
    _mm256_cmpgt_epi32(_mm256_set1_epi32(len), _mm256_setr_epi32(0, 1, 2, 3, 4, 5, 6, 7))
}

#[inline]
#[target_feature(enable = "avx2")]
pub(super) fn splat(value: f32) -> __m512 {
    let half = _mm256_set1_ps(value);
    join([half, half])
}

#[inline]
#[target_feature(enable = "avx2")]
pub(super) fn add(a: __m512, b: __m512) -> __m512 {
    let [a_lo, a_hi] = split(a);
    let [b_lo, b_hi] = split(b);
    join([_mm256_add_ps(a_lo, b_lo), _mm256_add_ps(a_hi, b_hi)])
}

/// `ptr` must be valid for 16 reads. No alignment needed.
#[inline]
#[target_feature(enable = "avx2")]
pub(super) unsafe fn loadu(ptr: *const f32) -> __m512 {
    unsafe { join([_mm256_loadu_ps(ptr), _mm256_loadu_ps(ptr.add(HALF))]) }
}

/// `ptr` must be valid for 16 reads and 64-byte aligned (each half is then 32-byte aligned).
#[inline]
#[target_feature(enable = "avx2")]
pub(super) unsafe fn load(ptr: *const f32) -> __m512 {
    unsafe { join([_mm256_load_ps(ptr), _mm256_load_ps(ptr.add(HALF))]) }
}

/// `ptr` must be valid for `len` reads. Lanes past `len` are zeroed and never touched
/// in memory.
#[inline]
#[target_feature(enable = "avx2")]
pub(super) unsafe fn maskz_loadu(ptr: *const f32, len: usize) -> __m512 {
    let lo = unsafe { _mm256_maskload_ps(ptr, half_mask(len)) };
    let hi = if len > HALF {
        unsafe { _mm256_maskload_ps(ptr.add(HALF), half_mask(len - HALF)) }
    } else {
        _mm256_setzero_ps()
    };
    join([lo, hi])
}

/// `ptr` must be valid for 16 writes and 64-byte aligned.
#[inline]
#[target_feature(enable = "avx2")]
pub(super) unsafe fn store(ptr: *mut f32, a: __m512) {
    let [lo, hi] = split(a);
    unsafe {
        _mm256_store_ps(ptr, lo);
        _mm256_store_ps(ptr.add(HALF), hi);
    }
}

/// `ptr` must be valid for 16 writes. No alignment needed.
#[inline]
#[target_feature(enable = "avx2")]
pub(super) unsafe fn storeu(ptr: *mut f32, a: __m512) {
    let [lo, hi] = split(a);
    unsafe {
        _mm256_storeu_ps(ptr, lo);
        _mm256_storeu_ps(ptr.add(HALF), hi);
    }
}

/// `ptr` must be valid for `len` writes. Memory past `len` is left untouched.
#[inline]
#[target_feature(enable = "avx2")]
pub(super) unsafe fn mask_storeu(ptr: *mut f32, len: usize, a: __m512) {
    let [lo, hi] = split(a);
    unsafe {
        _mm256_maskstore_ps(ptr, half_mask(len), lo);
        if len > HALF {
            _mm256_maskstore_ps(ptr.add(HALF), half_mask(len - HALF), hi);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::{AlignedBlock, SIMD_LANECOUNT};

    fn has_avx2() -> bool {
        std::arch::is_x86_feature_detected!("avx2")
    }

    fn lanes(register: __m512) -> [f32; SIMD_LANECOUNT] {
        unsafe { std::mem::transmute::<__m512, [f32; SIMD_LANECOUNT]>(register) }
    }

    #[test]
    fn test_halves_keep_lane_order() {
        if !has_avx2() {
            return;
        }
        let x: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let v = unsafe { loadu(x.as_ptr()) };
        assert_eq!(lanes(v)[..], x[..]);
    }

    #[test]
    fn test_kernels_round_trip_through_aligned_block() {
        if !has_avx2() {
            return;
        }
        let x: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let y: Vec<f32> = (0..16).rev().map(|i| i as f32).collect();
        let mut out = AlignedBlock::zeroed();

        unsafe {
            let sum = add(loadu(x.as_ptr()), loadu(y.as_ptr()));
            store(out.as_mut_ptr(), sum);
        }
        assert_eq!(out.data, [15.0; SIMD_LANECOUNT]);
    }

    #[test]
    fn test_masked_kernels_on_both_halves() {
        if !has_avx2() {
            return;
        }
        for len in [0, 3, 8, 11, 16] {
            let src: Vec<f32> = (1..=len).map(|i| i as f32).collect();
            let mut dst = [-1.0f32; SIMD_LANECOUNT];

            let loaded = unsafe { maskz_loadu(src.as_ptr(), len) };
            let expected: [f32; SIMD_LANECOUNT] =
                std::array::from_fn(|i| if i < len { (i + 1) as f32 } else { 0.0 });
            assert_eq!(lanes(loaded), expected, "len={len}");

            unsafe {
                let doubled = add(loaded, loaded);
                mask_storeu(dst.as_mut_ptr(), len, doubled);
            }
            for (i, v) in dst.iter().enumerate() {
                let want = if i < len { 2.0 * (i + 1) as f32 } else { -1.0 };
                assert_eq!(*v, want, "len={len} lane={i}");
            }
        }
    }

    #[test]
    fn test_splat_and_unaligned_store() {
        if !has_avx2() {
            return;
        }
        let mut dst = [0.0f32; SIMD_LANECOUNT + 1];
        unsafe {
            let aligned = AlignedBlock::new([2.5; SIMD_LANECOUNT]);
            let v = add(splat(0.5), load(aligned.as_ptr()));
            storeu(dst.as_mut_ptr().add(1), v);
        }
        assert_eq!(dst[0], 0.0);
        assert_eq!(dst[1..], [3.0; SIMD_LANECOUNT]);
    }
}
