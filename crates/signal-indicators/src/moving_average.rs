//! Moving average indicators.

use signal_core::traits::Indicator;

/// Rolling arithmetic mean of the last `period` values. With
/// [`Sma::min_periods`] below the period, the leading outputs average the
/// partial window instead of being skipped.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    min_periods: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            min_periods: period,
        }
    }

    /// Accept partial windows of at least `min_periods` points.
    pub fn min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = min_periods.clamp(1, self.period);
        self
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.min_periods {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.min_periods + 1);
        let mut sum = 0.0;

        for (i, &value) in data.iter().enumerate() {
            sum += value;
            if i >= self.period {
                sum -= data[i - self.period];
            }
            let count = (i + 1).min(self.period);
            if count >= self.min_periods {
                result.push(sum / count as f64);
            }
        }

        result
    }

    fn period(&self) -> usize {
        self.min_periods
    }
}

/// Exponential moving average seeded with the simple mean of the first
/// `period` values, smoothing factor `2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
        }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let (head, tail) = data.split_at(self.period);
        let seed = head.iter().sum::<f64>() / self.period as f64;

        let mut out = Vec::with_capacity(tail.len() + 1);
        out.push(seed);
        let mut ema = seed;
        for &value in tail {
            ema += self.alpha * (value - ema);
            out.push(ema);
        }
        out
    }

    fn period(&self) -> usize {
        self.period
    }
}
