//! 16-lane `f32` vectors and the kernels behind them.
//!
//! [`F32x16`] wraps a 512-bit register and dispatches every operation on [`Isa::active`]:
//! AVX-512F intrinsics, AVX2 intrinsics over two 8-lane halves, or a portable fallback.
//! [`AlignedBlock`] is the 64-byte aligned memory an aligned store targets.

mod aligned_block;
#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
mod avx512;
mod f32slice;
mod f32x16;
mod fallback;
mod integer;
mod isa;

pub use aligned_block::{AlignedBlock, SIMD_ALIGN, SIMD_LANECOUNT};
pub use f32slice::{LanewiseAdd, add_slices, add_slices_with_stats};
pub use f32x16::F32x16;
pub use integer::add_scalars;
pub use isa::Isa;
