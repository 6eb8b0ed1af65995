use super::ledger::{CostLedger, EventKind};
use super::lookback::LookbackStats;
use crate::grid::CHANNELS;
use std::fmt;

const CHANNEL_NAMES: [char; CHANNELS] = ['r', 'g', 'b'];

/// The modeled cost of one scheme over one image.
///
/// Ratios compare the modeled cost against the cost of coding every sample
/// of the grid with the scheme's worst-case width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostReport {
    label: &'static str,
    pixels: u64,
    worst_width: u32,
    channels: [CostLedger; CHANNELS],
    lookback: Option<LookbackStats>,
}

impl CostReport {
    pub fn new(
        label: &'static str,
        pixels: usize,
        worst_width: u32,
        channels: [CostLedger; CHANNELS],
    ) -> CostReport {
        CostReport {
            label,
            pixels: pixels as u64,
            worst_width,
            channels,
            lookback: None,
        }
    }

    pub fn with_lookback(mut self, stats: LookbackStats) -> CostReport {
        self.lookback = Some(stats);
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Returns the number of pixels in the grid, visited or not.
    pub fn pixels(&self) -> u64 {
        self.pixels
    }

    pub fn channel(&self, chan: usize) -> &CostLedger {
        &self.channels[chan]
    }

    pub fn lookback(&self) -> Option<&LookbackStats> {
        self.lookback.as_ref()
    }

    pub fn total_bits(&self) -> u64 {
        self.channels.iter().map(CostLedger::total_bits).sum()
    }

    /// Returns the cost of coding one channel with worst-case values only.
    pub fn worst_channel_bits(&self) -> u64 {
        self.pixels * u64::from(self.worst_width)
    }

    /// Returns the overall compression ratio. An empty grid has ratio 0.
    pub fn ratio(&self) -> f64 {
        let worst = self.worst_channel_bits() * CHANNELS as u64;
        if worst == 0 {
            return 0.0;
        }
        self.total_bits() as f64 / worst as f64
    }

    pub fn channel_ratios(&self) -> [f64; CHANNELS] {
        let worst = self.worst_channel_bits();
        std::array::from_fn(|chan| {
            if worst == 0 {
                0.0
            } else {
                self.channels[chan].total_bits() as f64 / worst as f64
            }
        })
    }

    /// Returns a view that renders every counter of the report.
    pub fn details(&self) -> Details<'_> {
        Details(self)
    }

    fn per_channel<F>(&self, f: F) -> [u64; CHANNELS]
    where
        F: Fn(&CostLedger) -> u64,
    {
        std::array::from_fn(|chan| f(&self.channels[chan]))
    }
}

impl fmt::Display for CostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.label)?;
        writeln!(f, "compression ratio by channel {:?}", self.channel_ratios())?;
        write!(f, "compression ratio {}", self.ratio())
    }
}

/// Renders the raw counters behind a `CostReport`.
pub struct Details<'a>(&'a CostReport);

impl fmt::Display for Details<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "total pixels {}", report.pixels)?;
        writeln!(f, "worst channel cost {}", report.worst_channel_bits())?;
        writeln!(f, "chan costs {:?}", report.per_channel(CostLedger::total_bits))?;
        for kind in EventKind::ALL {
            let counts = report.per_channel(|ledger| ledger.count(kind));
            writeln!(f, "n {} vals {:?}", kind.name(), counts)?;
        }

        if let Some(stats) = &report.lookback {
            writeln!(f, "n chans replaced {:?}", stats.resolved())?;
            for (chan, name) in CHANNEL_NAMES.iter().enumerate() {
                write!(f, "{} lookback deltas", name)?;
                for (delta, count) in stats.offsets(chan) {
                    write!(f, " {}:{}", delta, count)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
