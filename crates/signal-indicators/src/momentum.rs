//! Momentum indicators.

use serde::{Deserialize, Serialize};
use signal_core::traits::{Indicator, MultiOutputIndicator};

use crate::moving_average::Ema;

/// Wilder's Relative Strength Index.
///
/// The first average gain and loss are simple means over `period` changes;
/// later ones use Wilder smoothing, `avg = (avg * (n - 1) + x) / n`.
/// A window with no movement at all reads 50.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn level(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        let n = self.period as f64;
        let split = |w: &[f64]| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        };

        let mut changes = data.windows(2).map(split);
        let (mut avg_gain, mut avg_loss) = changes
            .by_ref()
            .take(self.period)
            .fold((0.0, 0.0), |(g, l), (gain, loss)| (g + gain, l + loss));
        avg_gain /= n;
        avg_loss /= n;

        let mut out = Vec::with_capacity(data.len() - self.period);
        out.push(Self::level(avg_gain, avg_loss));
        for (gain, loss) in changes {
            avg_gain = (avg_gain * (n - 1.0) + gain) / n;
            avg_loss = (avg_loss * (n - 1.0) + loss) / n;
            out.push(Self::level(avg_gain, avg_loss));
        }
        out
    }

    fn period(&self) -> usize {
        // one extra close for the first change
        self.period + 1
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD(fast, slow, signal) over closes.
///
/// Outputs start once the slow EMA and then the signal EMA are seeded, so
/// the first value needs `slow + signal - 1` closes.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// The conventional 12/26/9 configuration.
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        if data.len() < self.period() {
            return vec![];
        }

        let fast_ema = self.fast.calculate(data);
        let slow_ema = self.slow.calculate(data);

        // The fast EMA is seeded earlier; drop its head so both end together
        let lead = self.slow_period - self.fast_period;
        let line: Vec<f64> = fast_ema
            .iter()
            .skip(lead)
            .zip(&slow_ema)
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = self.signal.calculate(&line);
        line.iter()
            .skip(self.signal_period - 1)
            .zip(signal_line)
            .map(|(&macd, signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.slow_period + self.signal_period
    }
}
