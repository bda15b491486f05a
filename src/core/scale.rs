use crate::error::{CardError, CardResult};

/// Continuous mapping from a value domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> CardResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(CardError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start: 0.0,
            range_end: 1.0,
        })
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> CardResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(CardError::InvalidData("scale range must be finite".to_owned()));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(self)
    }

    /// Maps a domain value to pixels. Non-finite values map to the range start
    /// so a malformed weight collapses to an empty bar.
    #[must_use]
    pub fn domain_to_pixel(self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.range_start;
        }
        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }
}

/// Ordinal band scale with equal inner and outer padding, centered in its
/// range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    band_count: usize,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(
        band_count: usize,
        range_start: f64,
        range_end: f64,
        padding: f64,
    ) -> CardResult<Self> {
        if !(0.0..1.0).contains(&padding) {
            return Err(CardError::InvalidData("band padding must be in [0, 1)".to_owned()));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(CardError::InvalidData("band range must be finite".to_owned()));
        }

        let n = band_count as f64;
        let extent = range_end - range_start;
        let step = extent / (n - padding + 2.0 * padding).max(1.0);
        let start = range_start + (extent - step * (n - padding)) * 0.5;
        Ok(Self {
            band_count,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        })
    }

    #[must_use]
    pub fn band_start(&self, index: usize) -> Option<f64> {
        (index < self.band_count).then(|| self.start + self.step * index as f64)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }
}
