use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    full_chunks: usize,
    masked_tails: usize,
    lanes: usize,
}

impl Stats {
    pub fn new() -> Self {
        Stats {
            full_chunks: 0,
            masked_tails: 0,
            lanes: 0,
        }
    }

    /// Record that `amount` full-width (16 lane) kernels ran
    pub fn bump_full_chunks(&mut self, amount: usize) {
        self.full_chunks += amount;
        self.lanes += amount * crate::numerics::SIMD_LANECOUNT;
    }

    /// Record that one masked kernel ran over the last `lanes` values of a buffer
    pub fn bump_masked_tail(&mut self, lanes: usize) {
        self.masked_tails += 1;
        self.lanes += lanes;
    }

    pub fn get_full_chunks(&self) -> usize {
        self.full_chunks
    }

    pub fn get_masked_tails(&self) -> usize {
        self.masked_tails
    }

    /// Number of output values produced
    pub fn get_lanes(&self) -> usize {
        self.lanes
    }

    pub fn merge(&self, other: &Stats) -> Stats {
        Stats {
            full_chunks: self.full_chunks + other.full_chunks,
            masked_tails: self.masked_tails + other.masked_tails,
            lanes: self.lanes + other.lanes,
        }
    }

    pub fn dump(&self) {
        info!(
            full_chunks = self.full_chunks,
            masked_tails = self.masked_tails,
            lanes = self.lanes,
            "kernel statistics"
        );
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats::new()
    }
}
