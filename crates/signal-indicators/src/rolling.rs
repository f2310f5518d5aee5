//! Trailing-window statistics with a minimum-observation rule.
//!
//! A window covers the latest point and up to `window - 1` points before it.
//! Statistics are only defined once the window holds at least
//! `min_periods` points.

use crate::volatility::std_dev;

/// Window length plus the minimum number of observations required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rolling {
    pub window: usize,
    pub min_periods: usize,
}

impl Rolling {
    pub fn new(window: usize, min_periods: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            min_periods: min_periods.clamp(1, window),
        }
    }

    /// The trailing window ending at `end` (inclusive), if it has enough points.
    fn window_at<'a>(&self, data: &'a [f64], end: usize) -> Option<&'a [f64]> {
        if end >= data.len() {
            return None;
        }
        let start = (end + 1).saturating_sub(self.window);
        let slice = &data[start..=end];
        (slice.len() >= self.min_periods).then_some(slice)
    }

    fn last_window<'a>(&self, data: &'a [f64]) -> Option<&'a [f64]> {
        data.len()
            .checked_sub(1)
            .and_then(|end| self.window_at(data, end))
    }

    /// Mean of the latest window.
    pub fn mean_last(&self, data: &[f64]) -> Option<f64> {
        self.last_window(data)
            .map(|w| w.iter().sum::<f64>() / w.len() as f64)
    }

    /// Sample standard deviation of the latest window.
    pub fn std_last(&self, data: &[f64]) -> Option<f64> {
        self.last_window(data).and_then(|w| std_dev(w, 1))
    }

    /// Maximum of the latest window.
    pub fn max_last(&self, data: &[f64]) -> Option<f64> {
        self.last_window(data)
            .map(|w| w.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Median of every trailing window, aligned with the input.
    pub fn medians(&self, data: &[f64]) -> Vec<Option<f64>> {
        (0..data.len())
            .map(|end| self.window_at(data, end).and_then(median))
            .collect()
    }
}

/// Median of a slice, `None` when it is empty.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        n if n % 2 == 0 => Some((sorted[mid - 1] + sorted[mid]) / 2.0),
        _ => Some(sorted[mid]),
    }
}

/// Fractional change between the latest value and the one `periods` earlier.
///
/// `None` when the series is too short or the base is not positive.
pub fn pct_change_last(data: &[f64], periods: usize) -> Option<f64> {
    let last = *data.last()?;
    let base = *data.get(data.len().checked_sub(periods + 1)?)?;
    (base > 0.0 && base.is_finite() && last.is_finite()).then(|| last / base - 1.0)
}

/// Return from the close `lookback` points back (counting the latest as
/// the first) to the latest close: `data[len-1] / data[len-lookback] - 1`.
pub fn trailing_return(data: &[f64], lookback: usize) -> Option<f64> {
    pct_change_last(data, lookback.checked_sub(1)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_respects_min_periods() {
        let rolling = Rolling::new(20, 5);

        assert!(rolling.mean_last(&[1.0, 2.0, 3.0, 4.0]).is_none());
        assert!((rolling.mean_last(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap() - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_window_is_trailing() {
        let rolling = Rolling::new(3, 1);
        let data = [1.0, 2.0, 3.0, 10.0];

        assert!((rolling.mean_last(&data).unwrap() - 5.0).abs() < 1e-10);
        assert_eq!(rolling.max_last(&data), Some(10.0));
    }

    #[test]
    fn test_sample_std() {
        let rolling = Rolling::new(20, 2);

        assert!((rolling.std_last(&[2.0, 4.0, 6.0]).unwrap() - 2.0).abs() < 1e-10);
        assert_eq!(rolling.std_last(&[5.0, 5.0, 5.0]), Some(0.0));
    }

    #[test]
    fn test_medians_aligned() {
        let medians = Rolling::new(3, 1).medians(&[100.0, 120.0, 110.0, 500.0, 130.0]);

        assert_eq!(
            medians,
            vec![Some(100.0), Some(110.0), Some(110.0), Some(120.0), Some(130.0)]
        );
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_pct_change() {
        assert!((pct_change_last(&[100.0, 50.0, 110.0], 2).unwrap() - 0.1).abs() < 1e-10);
        assert!(pct_change_last(&[100.0, 110.0], 2).is_none());
        assert!(pct_change_last(&[0.0, 1.0], 1).is_none());
    }

    #[test]
    fn test_trailing_return_counts_latest() {
        let data = [100.0, 101.0, 102.0, 103.0, 110.0];

        // data[4] / data[0] - 1
        assert!((trailing_return(&data, 5).unwrap() - 0.1).abs() < 1e-10);
        assert!(trailing_return(&data, 6).is_none());
        assert!(trailing_return(&data, 0).is_none());
    }
}
