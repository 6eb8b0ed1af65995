use super::config::EstimatorConfig;
use super::ledger::{CostLedger, EventKind};
use super::report::CostReport;
use super::CostModel;
use crate::grid::{PixelGrid, CHANNELS};
use crate::scan::{history_window, scan_len};
use log::debug;
use rayon::prelude::*;

/// How a channel of the current pixel was found in its history window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Resolution {
    /// Equal to the value `distance` positions back.
    Match { distance: usize },
    /// Within the tolerance of a previous value, but not equal to it.
    Near,
}

/// Searches the history window of position `idx`, nearest first, for every
/// channel of the pixel there.
///
/// A channel resolves at the first position whose value differs from the
/// current one by at most `tolerance`, and is not examined again.
pub(super) fn resolve_pixel(
    grid: &PixelGrid,
    idx: usize,
    window: usize,
    tolerance: i32,
) -> [Option<Resolution>; CHANNELS] {
    let current = grid.pixel(idx);
    let mut resolved = [None; CHANNELS];
    let mut n_resolved = 0;

    for past in history_window(idx, window) {
        for chan in 0..CHANNELS {
            if resolved[chan].is_some() {
                continue;
            }
            let diff = current[chan] - grid.sample(past, chan);
            if diff == 0 {
                resolved[chan] = Some(Resolution::Match {
                    distance: idx - past,
                });
                n_resolved += 1;
            } else if diff.abs() <= tolerance {
                resolved[chan] = Some(Resolution::Near);
                n_resolved += 1;
            }
        }
        if n_resolved == CHANNELS {
            break;
        }
    }
    resolved
}

/// Statistics specific to the history-window schemes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookbackStats {
    // resolved[k] - the number of pixels with exactly k resolved channels.
    resolved: [u64; CHANNELS + 1],
    // offsets[chan][d - 1] - the number of exact matches found d positions back.
    offsets: [Vec<u64>; CHANNELS],
}

impl LookbackStats {
    fn new(window: usize) -> LookbackStats {
        LookbackStats {
            resolved: [0; CHANNELS + 1],
            offsets: std::array::from_fn(|_| vec![0; window]),
        }
    }

    /// Returns how many pixels had 0, 1, 2 and 3 channels resolved.
    pub fn resolved(&self) -> [u64; CHANNELS + 1] {
        self.resolved
    }

    /// Returns the backward offsets (negative) at which channel `chan` was
    /// matched exactly, with their frequencies. Offsets that never occurred
    /// are skipped.
    pub fn offsets(&self, chan: usize) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.offsets[chan]
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(i, &count)| (-(i as i64) - 1, count))
    }

    fn merge(&mut self, other: &LookbackStats) {
        for (a, b) in self.resolved.iter_mut().zip(other.resolved) {
            *a += b;
        }
        for (ours, theirs) in self.offsets.iter_mut().zip(&other.offsets) {
            for (a, b) in ours.iter_mut().zip(theirs) {
                *a += b;
            }
        }
    }
}

struct Tally {
    ledgers: [CostLedger; CHANNELS],
    stats: LookbackStats,
}

impl Tally {
    fn new(window: usize) -> Tally {
        Tally {
            ledgers: Default::default(),
            stats: LookbackStats::new(window),
        }
    }

    fn merge(mut self, other: Tally) -> Tally {
        for (a, b) in self.ledgers.iter_mut().zip(&other.ledgers) {
            a.merge(b);
        }
        self.stats.merge(&other.stats);
        self
    }
}

/// Runs the history-window search over every scanned pixel and charges each
/// channel with `cost(resolution)`.
///
/// Pixels only read the grid, so they are classified in parallel and the
/// partial tallies are summed.
pub(super) fn scan_history<F>(
    grid: &PixelGrid,
    window: usize,
    tolerance: i32,
    cost: F,
) -> ([CostLedger; CHANNELS], LookbackStats)
where
    F: Fn(Option<Resolution>) -> (EventKind, u32) + Sync,
{
    let tally = (0..scan_len(grid))
        .into_par_iter()
        .fold(
            || Tally::new(window),
            |mut tally, idx| {
                let resolved = resolve_pixel(grid, idx, window, tolerance);
                let mut n_resolved = 0;
                for (chan, resolution) in resolved.iter().enumerate() {
                    let (kind, bits) = cost(*resolution);
                    tally.ledgers[chan].record(kind, bits);
                    match resolution {
                        Some(Resolution::Match { distance }) => {
                            tally.stats.offsets[chan][distance - 1] += 1;
                            n_resolved += 1;
                        }
                        Some(Resolution::Near) => n_resolved += 1,
                        None => {}
                    }
                }
                tally.stats.resolved[n_resolved] += 1;
                tally
            },
        )
        .reduce(|| Tally::new(window), Tally::merge);

    (tally.ledgers, tally.stats)
}

/// Returns the number of positions searched for `lookback_bits`.
///
/// # Panics
///
/// Panics if the window does not fit in a `usize`.
pub(super) fn window_size(lookback_bits: u32) -> usize {
    1usize
        .checked_shl(lookback_bits)
        .expect("lookback bits is too big!")
}

/// Codes each channel either as a raw value or as a reference to an equal
/// value in the last `2^lookback_bits` positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookbackMatcher {
    lookback_bits: u32,
    config: EstimatorConfig,
}

impl LookbackMatcher {
    pub const DEFAULT_LOOKBACK_BITS: u32 = 2;

    pub fn new(lookback_bits: u32, config: EstimatorConfig) -> LookbackMatcher {
        LookbackMatcher {
            lookback_bits,
            config,
        }
    }
}

impl CostModel for LookbackMatcher {
    fn label(&self) -> &'static str {
        "OFFSET ONLY"
    }

    fn estimate(&self, grid: &PixelGrid) -> CostReport {
        let window = window_size(self.lookback_bits);
        debug!(
            "{}: {}x{} grid, window of {} pixels",
            self.label(),
            grid.rows(),
            grid.cols(),
            window
        );

        let raw_width = self.config.bits_per_channel;
        let (ledgers, stats) = scan_history(grid, window, 0, |resolution| match resolution {
            None => (EventKind::Literal, raw_width),
            Some(_) => (EventKind::Same, self.lookback_bits),
        });

        CostReport::new(self.label(), grid.len(), raw_width, ledgers).with_lookback(stats)
    }
}
