use super::config::{DiffRange, EstimatorConfig};
use super::ledger::{CostLedger, EventKind};
use super::report::CostReport;
use super::CostModel;
use crate::grid::{PixelGrid, CHANNELS};
use crate::scan::scan_len;
use log::debug;
use rayon::prelude::*;

// A raw value is coded as   00 ########
// a run start as            01 <rle_bits>
// a positive difference as  10 <diff_bits>
// a negative difference as  11 <diff_bits>

/// Code widths used by the moving-average predictor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Widths {
    raw_val: u32,
    diff: u32,
    rle: u32,
    max_run_len: u64,
    range: DiffRange,
}

/// The prediction state of one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictorState {
    // `None` until the first sample is seen.
    average: Option<i32>,
    run_length: u64,
    widths: Widths,
}

impl PredictorState {
    fn new(widths: Widths) -> PredictorState {
        PredictorState {
            average: None,
            run_length: 0,
            widths,
        }
    }

    /// Returns the current prediction, if any sample was seen.
    pub fn average(&self) -> Option<i32> {
        self.average
    }

    pub fn run_length(&self) -> u64 {
        self.run_length
    }

    /// Classifies the next sample against the current average, then moves
    /// the average halfway towards the sample.
    ///
    /// Returns the sample's kind and cost in bits.
    pub fn step(&mut self, sample: i32) -> (EventKind, u32) {
        let widths = self.widths;

        let average = match self.average {
            None => {
                self.average = Some(sample);
                return (EventKind::Literal, widths.raw_val);
            }
            Some(average) => average,
        };

        let event = if sample == average {
            self.run_length += 1;
            if self.run_length >= widths.max_run_len {
                self.run_length = 0;
                (EventKind::Literal, widths.raw_val)
            } else if self.run_length == 1 {
                (EventKind::RunStart, widths.rle)
            } else {
                // Already paid for by the run start.
                (EventKind::Same, 0)
            }
        } else {
            self.run_length = 0;
            if widths.range.contains(sample - average) {
                (EventKind::Diff, widths.diff)
            } else {
                (EventKind::Literal, widths.raw_val)
            }
        };

        // Floor division, so negative residuals round towards negative infinity.
        self.average = Some(average + (sample - average).div_euclid(2));
        event
    }
}

/// Predicts every channel from an exponential moving average of its previous
/// samples, coding repeats of the prediction as runs of up to
/// `2^rle_bits - 1` samples and small misses as bounded differences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovingAveragePredictor {
    diff_bits: u32,
    rle_bits: u32,
    config: EstimatorConfig,
}

impl MovingAveragePredictor {
    pub const DEFAULT_DIFF_BITS: u32 = 3;
    pub const DEFAULT_RLE_BITS: u32 = 0;

    pub fn new(diff_bits: u32, rle_bits: u32, config: EstimatorConfig) -> MovingAveragePredictor {
        MovingAveragePredictor {
            diff_bits,
            rle_bits,
            config,
        }
    }

    fn widths(&self) -> Widths {
        Widths {
            raw_val: self.config.bits_per_channel + 2,
            diff: self.diff_bits + 2,
            rle: self.rle_bits + 2,
            max_run_len: 1u64
                .checked_shl(self.rle_bits)
                .expect("rle bits is too big!"),
            range: DiffRange::new(self.diff_bits),
        }
    }

    /// Returns a fresh predictor state for one channel.
    pub fn predictor_state(&self) -> PredictorState {
        PredictorState::new(self.widths())
    }

    /// Runs a fresh predictor over a sequence of samples.
    pub fn code_channel<I>(&self, samples: I) -> CostLedger
    where
        I: IntoIterator<Item = i32>,
    {
        let mut state = self.predictor_state();
        let mut ledger = CostLedger::new();
        for sample in samples {
            let (kind, bits) = state.step(sample);
            ledger.record(kind, bits);
        }
        ledger
    }
}

impl CostModel for MovingAveragePredictor {
    fn label(&self) -> &'static str {
        "MOVING AVG"
    }

    fn estimate(&self, grid: &PixelGrid) -> CostReport {
        debug!(
            "{}: {}x{} grid, {} diff bits, {} rle bits",
            self.label(),
            grid.rows(),
            grid.cols(),
            self.diff_bits,
            self.rle_bits
        );

        let len = scan_len(grid);
        let mut ledgers: [CostLedger; CHANNELS] = Default::default();
        ledgers
            .par_iter_mut()
            .enumerate()
            .for_each(|(chan, ledger)| {
                *ledger = self.code_channel((0..len).map(|idx| grid.sample(idx, chan)));
            });

        CostReport::new(self.label(), grid.len(), self.widths().raw_val, ledgers)
    }
}
