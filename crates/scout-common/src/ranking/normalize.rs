/// Observed (min, max) bounds of one raw signal across the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRange {
    min: f64,
    max: f64,
}

impl SignalRange {
    /// Bounds over the given values. Returns `None` for an empty pool so the
    /// caller can decide what a missing range means for that signal.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut iter = values.into_iter();
        let first = iter.next()?;

        let mut range = SignalRange {
            min: first,
            max: first,
        };
        for value in iter {
            range.min = range.min.min(value);
            range.max = range.max.max(value);
        }
        Some(range)
    }

    /// Affine rescale into [0.1, 1.0]: `0.9 * (v - min) / (max - min) + 0.1`.
    ///
    /// Convention when the pool is fully tied (`max == min`): every candidate
    /// gets 1.0. Inputs are clamped to the observed bounds first.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return 1.0;
        }

        let clamped = value.clamp(self.min, self.max);
        0.9 * (clamped - self.min) / span + 0.1
    }
}
