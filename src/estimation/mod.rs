use crate::grid::PixelGrid;

pub use block_diff::{BlockDiffCoder, BlockState};
pub use config::{DiffRange, EstimatorConfig};
pub use ledger::{CostLedger, EventKind};
pub use lookback::{LookbackMatcher, LookbackStats};
pub use lookback_or_diff::LookbackOrDiffMatcher;
pub use moving_average::{MovingAveragePredictor, PredictorState};
pub use report::{CostReport, Details};

mod block_diff;
mod config;
mod ledger;
mod lookback;
mod lookback_or_diff;
mod moving_average;
mod report;

/// This trait is implemented by every scheme whose cost can be estimated.
pub trait CostModel {
    /// The name printed above the scheme's report.
    fn label(&self) -> &'static str;

    /// Walks the grid in raster order and returns the modeled cost.
    ///
    /// The grid is only read, so calling this twice gives the same report.
    fn estimate(&self, grid: &PixelGrid) -> CostReport;
}

/// A scheme together with its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    OffsetOnly { lookback_bits: u32 },
    OffsetOrDiff { lookback_bits: u32 },
    DiffBlock { diff_bits: u32 },
    MovingAverage { diff_bits: u32, rle_bits: u32 },
}

impl Scheme {
    pub fn offset_only() -> Scheme {
        Scheme::OffsetOnly {
            lookback_bits: LookbackMatcher::DEFAULT_LOOKBACK_BITS,
        }
    }

    pub fn offset_or_diff() -> Scheme {
        Scheme::OffsetOrDiff {
            lookback_bits: LookbackOrDiffMatcher::DEFAULT_LOOKBACK_BITS,
        }
    }

    pub fn diff_block() -> Scheme {
        Scheme::DiffBlock {
            diff_bits: BlockDiffCoder::DEFAULT_DIFF_BITS,
        }
    }

    pub fn moving_average() -> Scheme {
        Scheme::MovingAverage {
            diff_bits: MovingAveragePredictor::DEFAULT_DIFF_BITS,
            rle_bits: MovingAveragePredictor::DEFAULT_RLE_BITS,
        }
    }

    /// Returns every scheme with its default parameters.
    pub fn all() -> [Scheme; 4] {
        [
            Scheme::offset_only(),
            Scheme::offset_or_diff(),
            Scheme::diff_block(),
            Scheme::moving_average(),
        ]
    }

    /// Builds the cost model of this scheme.
    pub fn model(&self, config: EstimatorConfig) -> Box<dyn CostModel + Send + Sync> {
        match *self {
            Scheme::OffsetOnly { lookback_bits } => {
                Box::new(LookbackMatcher::new(lookback_bits, config))
            }
            Scheme::OffsetOrDiff { lookback_bits } => {
                Box::new(LookbackOrDiffMatcher::new(lookback_bits, config))
            }
            Scheme::DiffBlock { diff_bits } => Box::new(BlockDiffCoder::new(diff_bits, config)),
            Scheme::MovingAverage {
                diff_bits,
                rle_bits,
            } => Box::new(MovingAveragePredictor::new(diff_bits, rle_bits, config)),
        }
    }
}

/// Estimates the cost of coding `grid` with `scheme`.
pub fn estimate(grid: &PixelGrid, scheme: Scheme, config: EstimatorConfig) -> CostReport {
    scheme.model(config).estimate(grid)
}
