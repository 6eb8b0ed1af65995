/// Sample format shared by every scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// The width of a raw channel value.
    pub bits_per_channel: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        EstimatorConfig {
            bits_per_channel: 8,
        }
    }
}

/// The range of differences `[-(2^bits), 2^bits + 1]` that can be coded
/// with `bits` magnitude bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffRange {
    min: i32,
    max: i32,
}

impl DiffRange {
    /// # Panics
    ///
    /// Panics if `bits` is greater than 30.
    pub fn new(bits: u32) -> DiffRange {
        let magnitude = 1i32.checked_shl(bits).expect("diff bits is too big!");
        assert!(magnitude > 0, "diff bits is too big!");
        DiffRange {
            min: -magnitude,
            max: magnitude + 1,
        }
    }

    pub fn contains(&self, diff: i32) -> bool {
        diff >= self.min && diff <= self.max
    }
}

#[cfg(test)]
mod test {
    use super::DiffRange;

    #[test]
    fn test_diff_range_is_asymmetric() {
        let range = DiffRange::new(4);
        assert!(range.contains(-16));
        assert!(!range.contains(-17));
        assert!(range.contains(17));
        assert!(!range.contains(18));
        assert!(range.contains(0));

        let range = DiffRange::new(0);
        assert!(range.contains(-1));
        assert!(range.contains(2));
        assert!(!range.contains(3));
    }
}
