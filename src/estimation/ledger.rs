/// The categories a sample can be coded as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The raw value is stored.
    Literal,
    /// The value repeats a reference value.
    Same,
    /// The value is stored as a bounded difference from a reference value.
    Diff,
    /// The value starts a run of repeated values.
    RunStart,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Literal,
        EventKind::Same,
        EventKind::Diff,
        EventKind::RunStart,
    ];

    fn index(self) -> usize {
        match self {
            EventKind::Literal => 0,
            EventKind::Same => 1,
            EventKind::Diff => 2,
            EventKind::RunStart => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Literal => "raw",
            EventKind::Same => "same",
            EventKind::Diff => "diff",
            EventKind::RunStart => "run",
        }
    }
}

/// Bit cost and occurrence count of every `EventKind` seen in one channel.
///
/// Only ever grows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CostLedger {
    bits: [u64; EventKind::ALL.len()],
    counts: [u64; EventKind::ALL.len()],
}

impl CostLedger {
    pub fn new() -> CostLedger {
        CostLedger::default()
    }

    /// Records one event of the given kind costing `bits` bits.
    pub fn record(&mut self, kind: EventKind, bits: u32) {
        self.bits[kind.index()] += u64::from(bits);
        self.counts[kind.index()] += 1;
    }

    pub fn bits(&self, kind: EventKind) -> u64 {
        self.bits[kind.index()]
    }

    pub fn count(&self, kind: EventKind) -> u64 {
        self.counts[kind.index()]
    }

    pub fn total_bits(&self) -> u64 {
        self.bits.iter().sum()
    }

    /// Returns the number of events of any kind.
    pub fn events(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Adds all events of `other` to this ledger.
    pub fn merge(&mut self, other: &CostLedger) {
        for kind in EventKind::ALL {
            self.bits[kind.index()] += other.bits[kind.index()];
            self.counts[kind.index()] += other.counts[kind.index()];
        }
    }
}
