use super::config::EstimatorConfig;
use super::ledger::EventKind;
use super::lookback::{scan_history, window_size, Resolution};
use super::report::CostReport;
use super::CostModel;
use crate::grid::{PixelGrid, CHANNELS};
use log::debug;

/// Header bits charged to each channel of a pixel: one flag bit signaling
/// raw or resolved, doubled.
const CHANNEL_HEADER_BITS: u32 = 2;

/// Codes each channel either as a raw value or as a reference to a value in
/// the last `2^lookback_bits` positions that is equal to it or differs from
/// it by at most `2^lookback_bits`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookbackOrDiffMatcher {
    lookback_bits: u32,
    config: EstimatorConfig,
}

impl LookbackOrDiffMatcher {
    pub const DEFAULT_LOOKBACK_BITS: u32 = 3;

    pub fn new(lookback_bits: u32, config: EstimatorConfig) -> LookbackOrDiffMatcher {
        LookbackOrDiffMatcher {
            lookback_bits,
            config,
        }
    }
}

impl CostModel for LookbackOrDiffMatcher {
    fn label(&self) -> &'static str {
        "OFFSET OR DIFF"
    }

    fn estimate(&self, grid: &PixelGrid) -> CostReport {
        let window = window_size(self.lookback_bits);
        let tolerance = i32::try_from(window).expect("lookback bits is too big!");
        debug!(
            "{}: {}x{} grid, window of {} pixels, max diff {}",
            self.label(),
            grid.rows(),
            grid.cols(),
            window,
            tolerance
        );

        let raw_width = self.config.bits_per_channel + CHANNEL_HEADER_BITS;
        let resolved_width = self.lookback_bits + CHANNEL_HEADER_BITS;
        let (ledgers, stats) =
            scan_history(grid, window, tolerance, |resolution| match resolution {
                None => (EventKind::Literal, raw_width),
                Some(Resolution::Match { .. }) => (EventKind::Same, resolved_width),
                Some(Resolution::Near) => (EventKind::Diff, resolved_width),
            });

        // The worst case charges the whole pixel header to every channel.
        let worst_width = self.config.bits_per_channel + CHANNEL_HEADER_BITS * CHANNELS as u32;
        CostReport::new(self.label(), grid.len(), worst_width, ledgers).with_lookback(stats)
    }
}
