use super::config::{DiffRange, EstimatorConfig};
use super::ledger::{CostLedger, EventKind};
use super::report::CostReport;
use super::CostModel;
use crate::grid::{PixelGrid, CHANNELS};
use crate::scan::scan_len;
use log::debug;
use rayon::prelude::*;

const BLOCK_START_WIDTH: u32 = 1;
const BLOCK_STOP_WIDTH: u32 = 2;
const SAME_VAL_WIDTH: u32 = 2;

/// Code widths used by the block-diff coder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Widths {
    // A raw value plus its flag bit.
    full_val: u32,
    // A difference plus its start and sign bits.
    diff: u32,
    range: DiffRange,
}

/// The block of one channel.
///
/// A block is anchored on a literal value; every later sample is coded
/// against that anchor until one falls outside the difference range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockState {
    anchor: Option<i32>,
    active: bool,
    widths: Widths,
}

impl BlockState {
    fn new(widths: Widths) -> BlockState {
        BlockState {
            anchor: None,
            active: false,
            widths,
        }
    }

    /// Classifies the next sample and returns its kind and cost in bits.
    pub fn step(&mut self, sample: i32) -> (EventKind, u32) {
        let Widths {
            full_val,
            diff: diff_width,
            range,
        } = self.widths;

        let anchor = match self.anchor {
            None => {
                self.anchor = Some(sample);
                return (EventKind::Literal, full_val);
            }
            Some(anchor) => anchor,
        };

        let diff = sample - anchor;
        let (kind, bits) = if diff == 0 {
            (EventKind::Same, SAME_VAL_WIDTH)
        } else if range.contains(diff) {
            (EventKind::Diff, diff_width)
        } else if self.active {
            self.anchor = Some(sample);
            self.active = false;
            return (EventKind::Literal, BLOCK_STOP_WIDTH + full_val);
        } else {
            self.anchor = Some(sample);
            return (EventKind::Literal, full_val);
        };

        if self.active {
            (kind, bits)
        } else {
            self.active = true;
            (kind, BLOCK_START_WIDTH + bits)
        }
    }
}

/// Codes every channel as blocks of samples that stay within
/// `[-(2^diff_bits), 2^diff_bits + 1]` of the literal that opened the block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockDiffCoder {
    diff_bits: u32,
    config: EstimatorConfig,
}

impl BlockDiffCoder {
    pub const DEFAULT_DIFF_BITS: u32 = 4;

    pub fn new(diff_bits: u32, config: EstimatorConfig) -> BlockDiffCoder {
        BlockDiffCoder { diff_bits, config }
    }

    fn widths(&self) -> Widths {
        Widths {
            full_val: self.config.bits_per_channel + 1,
            diff: self.diff_bits + 2,
            range: DiffRange::new(self.diff_bits),
        }
    }

    /// Returns a fresh block state for one channel.
    pub fn block_state(&self) -> BlockState {
        BlockState::new(self.widths())
    }

    /// Runs a fresh block state over a sequence of samples.
    pub fn code_channel<I>(&self, samples: I) -> CostLedger
    where
        I: IntoIterator<Item = i32>,
    {
        let mut state = self.block_state();
        let mut ledger = CostLedger::new();
        for sample in samples {
            let (kind, bits) = state.step(sample);
            ledger.record(kind, bits);
        }
        ledger
    }
}

impl CostModel for BlockDiffCoder {
    fn label(&self) -> &'static str {
        "DIFF BLOCK"
    }

    fn estimate(&self, grid: &PixelGrid) -> CostReport {
        debug!(
            "{}: {}x{} grid, {} diff bits",
            self.label(),
            grid.rows(),
            grid.cols(),
            self.diff_bits
        );

        let len = scan_len(grid);
        let mut ledgers: [CostLedger; CHANNELS] = Default::default();
        ledgers
            .par_iter_mut()
            .enumerate()
            .for_each(|(chan, ledger)| {
                *ledger = self.code_channel((0..len).map(|idx| grid.sample(idx, chan)));
            });

        CostReport::new(self.label(), grid.len(), self.widths().full_val, ledgers)
    }
}
