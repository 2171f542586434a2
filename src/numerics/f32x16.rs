#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::__m512;
use std::{
    fmt,
    ops::{Add, AddAssign},
};

#[cfg(target_arch = "x86_64")]
use super::{avx2, avx512};
use super::{
    aligned_block::{AlignedBlock, SIMD_ALIGN, SIMD_LANECOUNT},
    fallback::{self, Lanes},
    isa::Isa,
};
use crate::error::LaneError;

#[cfg(target_arch = "x86_64")]
type Register = __m512;

#[cfg(not(target_arch = "x86_64"))]
type Register = Lanes;

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn to_register(lanes: Lanes) -> Register {
    // SAFETY: `__m512` is 64 bytes of packed f32, any bit pattern is valid for both types.
    unsafe { std::mem::transmute::<Lanes, __m512>(lanes) }
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn to_lanes(register: Register) -> Lanes {
    // SAFETY: see `to_register`.
    unsafe { std::mem::transmute::<__m512, Lanes>(register) }
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
fn to_register(lanes: Lanes) -> Register {
    lanes
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
fn to_lanes(register: Register) -> Lanes {
    register
}

/// Sixteen packed `f32` lanes.
///
/// On x86_64 this wraps a `__m512` register value. Operations run on AVX-512F or AVX2
/// when the CPU supports them (see [`Isa::active`]) and lane by lane otherwise. Every
/// operation is pure and returns a fresh value.
///
/// # Contract
///
/// - Loads never need alignment. Full loads need at least [`SIMD_LANECOUNT`] values.
/// - Full stores into raw memory need a 64-byte aligned address. [`AlignedBlock`]
///   provides that by construction.
#[derive(Clone, Copy)]
pub struct F32x16 {
    inner: Register,
}

impl F32x16 {
    pub const LANES: usize = SIMD_LANECOUNT;

    /// All lanes set to `value`.
    #[inline]
    pub fn splat(value: f32) -> Self {
        // SAFETY: the active backend is supported by the CPU.
        unsafe { Self::splat_on(Isa::active(), value) }
    }

    #[inline]
    pub fn from_array(lanes: [f32; SIMD_LANECOUNT]) -> Self {
        Self {
            inner: to_register(lanes),
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; SIMD_LANECOUNT] {
        to_lanes(self.inner)
    }

    /// Aligned load out of a block.
    #[inline]
    pub fn from_block(block: &AlignedBlock) -> Self {
        // SAFETY: the active backend is supported by the CPU.
        unsafe { Self::from_block_on(Isa::active(), block) }
    }

    #[inline]
    pub fn to_block(self) -> AlignedBlock {
        AlignedBlock::new(self.to_array())
    }

    /// Value of one lane.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 16`.
    #[inline]
    pub fn extract(self, index: usize) -> f32 {
        self.to_array()[index]
    }

    /// Unaligned load of `src[0..16]`. Extra values are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `src` holds fewer than 16 values.
    #[inline]
    pub fn load(src: &[f32]) -> Self {
        assert!(
            src.len() >= SIMD_LANECOUNT,
            "load needs at least {SIMD_LANECOUNT} values, got {}",
            src.len()
        );
        // SAFETY: length checked above.
        unsafe { Self::load_ptr(src.as_ptr()) }
    }

    pub fn try_load(src: &[f32]) -> Result<Self, LaneError> {
        if src.len() < SIMD_LANECOUNT {
            return Err(LaneError::ShortBuffer {
                needed: SIMD_LANECOUNT,
                got: src.len(),
            });
        }
        Ok(Self::load(src))
    }

    /// Unaligned load of 16 values starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of 16 consecutive `f32`.
    #[inline]
    pub unsafe fn load_ptr(ptr: *const f32) -> Self {
        unsafe { Self::load_ptr_on(Isa::active(), ptr) }
    }

    /// Masked load of up to 16 values. Lanes past `src.len()` are zero, and memory past
    /// the end of `src` is never read.
    ///
    /// # Panics
    ///
    /// Panics if `src` holds more than 16 values.
    #[inline]
    pub fn load_partial(src: &[f32]) -> Self {
        // SAFETY: the active backend is supported by the CPU.
        unsafe { Self::load_partial_on(Isa::active(), src) }
    }

    /// Aligned store of all 16 lanes.
    #[inline]
    pub fn store(self, dst: &mut AlignedBlock) {
        // SAFETY: an AlignedBlock is 16 lanes on a 64-byte boundary.
        unsafe { self.store_ptr(dst.as_mut_ptr()) }
    }

    /// Aligned store into a slice, checking length and alignment first.
    pub fn try_store(self, dst: &mut [f32]) -> Result<(), LaneError> {
        if dst.len() < SIMD_LANECOUNT {
            return Err(LaneError::ShortBuffer {
                needed: SIMD_LANECOUNT,
                got: dst.len(),
            });
        }
        let addr = dst.as_ptr() as usize;
        if !addr.is_multiple_of(SIMD_ALIGN) {
            return Err(LaneError::Misaligned {
                addr,
                align: SIMD_ALIGN,
            });
        }
        // SAFETY: length and alignment checked above.
        unsafe { self.store_ptr(dst.as_mut_ptr()) };
        Ok(())
    }

    /// Aligned store of 16 lanes to `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of 16 consecutive `f32` and 64-byte aligned.
    #[inline]
    pub unsafe fn store_ptr(self, ptr: *mut f32) {
        unsafe { self.store_ptr_on(Isa::active(), ptr) }
    }

    /// Unaligned store into `dst[0..16]`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` holds fewer than 16 values.
    #[inline]
    pub fn store_unaligned(self, dst: &mut [f32]) {
        // SAFETY: the active backend is supported by the CPU.
        unsafe { self.store_unaligned_on(Isa::active(), dst) }
    }

    /// Masked store of the first `dst.len()` lanes. Memory past the end of `dst` is
    /// never written.
    ///
    /// # Panics
    ///
    /// Panics if `dst` holds more than 16 values.
    #[inline]
    pub fn store_partial(self, dst: &mut [f32]) {
        // SAFETY: the active backend is supported by the CPU.
        unsafe { self.store_partial_on(Isa::active(), dst) }
    }
}

// Per-backend bodies of the operations above. Every `*_on` function requires `isa` to be
// supported by the running CPU; the public methods pass `Isa::active()`.
impl F32x16 {
    #[inline]
    unsafe fn splat_on(isa: Isa, value: f32) -> Self {
        match isa {
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => Self {
                inner: unsafe { avx512::splat(value) },
            },
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => Self {
                inner: unsafe { avx2::splat(value) },
            },
            _ => Self::from_array(fallback::splat(value)),
        }
    }

    #[inline]
    unsafe fn add_on(isa: Isa, a: Self, b: Self) -> Self {
        match isa {
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => Self {
                inner: unsafe { avx512::add(a.inner, b.inner) },
            },
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => Self {
                inner: unsafe { avx2::add(a.inner, b.inner) },
            },
            _ => Self::from_array(fallback::add(&a.to_array(), &b.to_array())),
        }
    }

    #[inline]
    unsafe fn from_block_on(isa: Isa, block: &AlignedBlock) -> Self {
        match isa {
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => Self {
                inner: unsafe { avx512::load(block.as_ptr()) },
            },
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => Self {
                inner: unsafe { avx2::load(block.as_ptr()) },
            },
            _ => Self::from_array(block.data),
        }
    }

    /// `ptr` must also be valid for reads of 16 consecutive `f32`.
    #[inline]
    unsafe fn load_ptr_on(isa: Isa, ptr: *const f32) -> Self {
        match isa {
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => Self {
                inner: unsafe { avx512::loadu(ptr) },
            },
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => Self {
                inner: unsafe { avx2::loadu(ptr) },
            },
            _ => {
                let src = unsafe { std::slice::from_raw_parts(ptr, SIMD_LANECOUNT) };
                Self::from_array(fallback::load(src))
            }
        }
    }

    #[inline]
    unsafe fn load_partial_on(isa: Isa, src: &[f32]) -> Self {
        assert!(
            src.len() <= SIMD_LANECOUNT,
            "partial load takes at most {SIMD_LANECOUNT} values, got {}",
            src.len()
        );
        match isa {
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => Self {
                inner: unsafe { avx512::maskz_loadu(src.as_ptr(), src.len()) },
            },
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => Self {
                inner: unsafe { avx2::maskz_loadu(src.as_ptr(), src.len()) },
            },
            _ => Self::from_array(fallback::load_partial(src)),
        }
    }

    /// `ptr` must also be valid for writes of 16 consecutive `f32` and 64-byte aligned.
    #[inline]
    unsafe fn store_ptr_on(self, isa: Isa, ptr: *mut f32) {
        debug_assert!((ptr as usize).is_multiple_of(SIMD_ALIGN));
        match isa {
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => unsafe { avx512::store(ptr, self.inner) },
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => unsafe { avx2::store(ptr, self.inner) },
            _ => {
                let dst = unsafe { std::slice::from_raw_parts_mut(ptr, SIMD_LANECOUNT) };
                dst.copy_from_slice(&self.to_array());
            }
        }
    }

    #[inline]
    unsafe fn store_unaligned_on(self, isa: Isa, dst: &mut [f32]) {
        assert!(
            dst.len() >= SIMD_LANECOUNT,
            "store needs room for {SIMD_LANECOUNT} values, got {}",
            dst.len()
        );
        match isa {
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => unsafe { avx512::storeu(dst.as_mut_ptr(), self.inner) },
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => unsafe { avx2::storeu(dst.as_mut_ptr(), self.inner) },
            _ => dst[..SIMD_LANECOUNT].copy_from_slice(&self.to_array()),
        }
    }

    #[inline]
    unsafe fn store_partial_on(self, isa: Isa, dst: &mut [f32]) {
        assert!(
            dst.len() <= SIMD_LANECOUNT,
            "partial store takes at most {SIMD_LANECOUNT} values, got {}",
            dst.len()
        );
        match isa {
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => unsafe {
                avx512::mask_storeu(dst.as_mut_ptr(), dst.len(), self.inner)
            },
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => unsafe { avx2::mask_storeu(dst.as_mut_ptr(), dst.len(), self.inner) },
            _ => fallback::store_partial(dst, &self.to_array()),
        }
    }
}

/// Lane-wise IEEE-754 addition.
impl Add for F32x16 {
    type Output = F32x16;

    #[inline]
    fn add(self, rhs: F32x16) -> Self::Output {
        // SAFETY: the active backend is supported by the CPU.
        unsafe { Self::add_on(Isa::active(), self, rhs) }
    }
}

impl AddAssign for F32x16 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Debug for F32x16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F32x16").field(&self.to_array()).finish()
    }
}
