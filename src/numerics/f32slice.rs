use crate::{
    error::LaneError,
    numerics::{
        aligned_block::{AlignedBlock, SIMD_LANECOUNT},
        f32x16::F32x16,
    },
    statistics::Stats,
};

/// Lane-wise addition over whole buffers. The trait exists because inherent impls
/// cannot be added to `[f32]` or `[AlignedBlock]` from outside std.
///
/// # Contract
///
/// - Both operands must have the same length.
pub trait LanewiseAdd {
    type Output;

    fn lanewise_add(&self, othr: &Self) -> Self::Output;
}

impl LanewiseAdd for [AlignedBlock] {
    type Output = Vec<AlignedBlock>;

    /// Adds block by block with aligned loads and stores.
    ///
    /// # Panics
    ///
    /// Panics if the two operands hold a different number of blocks.
    fn lanewise_add(&self, othr: &[AlignedBlock]) -> Vec<AlignedBlock> {
        assert_eq!(self.len(), othr.len());

        let mut returned = vec![AlignedBlock::zeroed(); self.len()];
        for ((block_self, block_othr), out) in self.iter().zip(othr).zip(returned.iter_mut()) {
            let sum = F32x16::from_block(block_self) + F32x16::from_block(block_othr);
            sum.store(out);
        }
        returned
    }
}

impl LanewiseAdd for [f32] {
    type Output = Result<Vec<f32>, LaneError>;

    fn lanewise_add(&self, othr: &[f32]) -> Result<Vec<f32>, LaneError> {
        add_slices(self, othr)
    }
}

/// `a[i] + b[i]` for every `i`, sixteen lanes at a time with one masked tail.
pub fn add_slices(a: &[f32], b: &[f32]) -> Result<Vec<f32>, LaneError> {
    let mut out = vec![0.0; a.len()];
    add_slices_with_stats(a, b, &mut out, &mut Stats::new())?;
    Ok(out)
}

/// Same as [`add_slices`] but writes into `out` and records the kernel calls in `stats`.
pub fn add_slices_with_stats(
    a: &[f32],
    b: &[f32],
    out: &mut [f32],
    stats: &mut Stats,
) -> Result<(), LaneError> {
    if a.len() != b.len() {
        return Err(LaneError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if out.len() != a.len() {
        return Err(LaneError::LengthMismatch {
            left: a.len(),
            right: out.len(),
        });
    }

    let (a_chunks, a_tail) = a.as_chunks::<SIMD_LANECOUNT>();
    let (b_chunks, b_tail) = b.as_chunks::<SIMD_LANECOUNT>();
    let (out_chunks, out_tail) = out.as_chunks_mut::<SIMD_LANECOUNT>();

    for ((chunk_a, chunk_b), chunk_out) in a_chunks.iter().zip(b_chunks).zip(out_chunks) {
        let sum = F32x16::load(chunk_a) + F32x16::load(chunk_b);
        sum.store_unaligned(chunk_out);
    }
    stats.bump_full_chunks(a_chunks.len());

    if !a_tail.is_empty() {
        let sum = F32x16::load_partial(a_tail) + F32x16::load_partial(b_tail);
        sum.store_partial(out_tail);
        stats.bump_masked_tail(a_tail.len());
    }

    Ok(())
}
