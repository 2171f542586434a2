pub const SIMD_LANECOUNT: usize = 16;

/// Byte alignment required by an aligned 512-bit store.
pub const SIMD_ALIGN: usize = 64;

/// Sixteen `f32` lanes placed on a 64-byte boundary, so that an aligned vector store
/// into it is always legal.
#[repr(align(64))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlignedBlock {
    pub data: [f32; SIMD_LANECOUNT],
}

impl AlignedBlock {
    pub fn new(data: [f32; SIMD_LANECOUNT]) -> Self {
        AlignedBlock { data }
    }

    pub fn zeroed() -> Self {
        AlignedBlock {
            data: [0.0; SIMD_LANECOUNT],
        }
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut f32 {
        self.data.as_mut_ptr()
    }

    /// Splits `data` into blocks, zero-padding the last one. An exact multiple of
    /// [`SIMD_LANECOUNT`] produces no padding block.
    pub fn allocate_padded(data: Vec<f32>) -> Vec<AlignedBlock> {
        let mut returned = Vec::with_capacity(data.len().div_ceil(SIMD_LANECOUNT));

        let (chunked, remainder) = data.as_chunks::<SIMD_LANECOUNT>();
        for &chunk in chunked.iter() {
            returned.push(Self::new(chunk));
        }

        if !remainder.is_empty() {
            let mut remainder_data = [0.0; SIMD_LANECOUNT];
            remainder_data[..remainder.len()].copy_from_slice(remainder);
            returned.push(Self::new(remainder_data));
        }
        returned
    }

    /// Inverse of [`AlignedBlock::allocate_padded`]: concatenates the blocks and drops
    /// everything past `len`.
    pub fn collect_truncated(blocks: &[AlignedBlock], len: usize) -> Vec<f32> {
        assert!(
            len <= blocks.len() * SIMD_LANECOUNT,
            "cannot take {len} values out of {} blocks",
            blocks.len()
        );
        blocks
            .iter()
            .flat_map(|block| block.data)
            .take(len)
            .collect()
    }
}
