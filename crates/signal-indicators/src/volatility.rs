//! Volatility indicators.

use signal_core::traits::Indicator;
use signal_core::types::BarSeries;

/// Standard deviation over a sliding window.
///
/// Population (ddof = 0) by default; [`StdDev::sample`] divides by N - 1
/// to match the rolling statistics used by the volume scorer.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
    ddof: usize,
}

impl StdDev {
    /// Create a new population standard deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period, ddof: 0 }
    }

    /// Sample standard deviation (N - 1 denominator).
    pub fn sample(period: usize) -> Self {
        Self {
            ddof: 1,
            ..Self::new(period)
        }
    }
}

/// Standard deviation of a slice with `ddof` delta degrees of freedom.
///
/// `None` when the slice has no more than `ddof` points.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    Some((ss / (n - ddof as f64)).sqrt())
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        data.windows(self.period)
            .filter_map(|window| std_dev(window, self.ddof))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }
}

/// Average True Range (ATR).
///
/// Measures market volatility by decomposing the entire range
/// of an asset price for that period.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Calculate ATR from OHLC data.
    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
        let len = high.len().min(low.len()).min(close.len());
        if len < self.period + 1 {
            return vec![];
        }

        let tr: Vec<f64> = (1..len)
            .map(|i| {
                let high_low = high[i] - low[i];
                let high_close = (high[i] - close[i - 1]).abs();
                let low_close = (low[i] - close[i - 1]).abs();
                high_low.max(high_close).max(low_close)
            })
            .collect();

        Self::wilder(&tr, self.period)
    }

    /// Latest ATR for a bar series, if it is long enough.
    pub fn latest_for(&self, series: &BarSeries) -> Option<f64> {
        self.calculate_ohlc(&series.highs(), &series.lows(), &series.closes())
            .pop()
            .filter(|atr| atr.is_finite())
    }

    fn wilder(tr: &[f64], period: usize) -> Vec<f64> {
        let period_f64 = period as f64;
        let mut result = Vec::with_capacity(tr.len() - period + 1);

        // Initial ATR is SMA of first 'period' true ranges
        let mut atr: f64 = tr[..period].iter().sum::<f64>() / period_f64;
        result.push(atr);

        for &tr_val in &tr[period..] {
            atr = (atr * (period_f64 - 1.0) + tr_val) / period_f64;
            result.push(atr);
        }

        result
    }
}

impl Indicator for Atr {
    type Output = f64;

    /// Close-only approximation: close-to-close moves stand in for true range.
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period + 1 {
            return vec![];
        }

        let tr: Vec<f64> = data.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        Self::wilder(&tr, self.period)
    }

    fn period(&self) -> usize {
        self.period + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::Bar;

    #[test]
    fn test_std_dev_population() {
        let std_dev = StdDev::new(3);
        let result = std_dev.calculate(&[2.0, 4.0, 6.0, 8.0, 10.0]);

        assert_eq!(result.len(), 3);
        // [2, 4, 6]: mean 4, variance 8/3
        assert!((result[0] - (8.0f64 / 3.0).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_std_dev_sample() {
        let std_dev = StdDev::sample(3);
        let result = std_dev.calculate(&[2.0, 4.0, 6.0]);

        // variance 8/2 = 4
        assert!((result[0] - 2.0).abs() < 1e-10);
        assert!(super::std_dev(&[5.0], 1).is_none());
    }

    #[test]
    fn test_atr_ohlc() {
        let atr = Atr::new(3);
        let high = vec![10.0, 11.0, 12.0, 11.0, 13.0, 14.0];
        let low = vec![8.0, 9.0, 10.0, 9.0, 11.0, 12.0];
        let close = vec![9.0, 10.0, 11.0, 10.0, 12.0, 13.0];

        let result = atr.calculate_ohlc(&high, &low, &close);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|v| *v > 0.0));
    }

    #[test]
    fn test_atr_constant_range() {
        let bars: Vec<Bar> = (0..20)
            .map(|i| Bar::new(i, 50.0, 51.0, 49.0, 50.0, 1000.0))
            .collect();
        let series = BarSeries::new("FLAT", bars);

        let atr = Atr::new(14).latest_for(&series).unwrap();
        assert!((atr - 2.0).abs() < 1e-10);
        assert!(Atr::new(14).latest_for(&BarSeries::empty("NONE")).is_none());
    }
}
