//! Daily OHLCV price bars and the per-symbol series the scorers consume.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Compact OHLCV bar.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Traded notional for the bar (close × volume).
    #[inline]
    pub fn dollar_volume(&self) -> f64 {
        self.close * self.volume
    }

    /// Whether the close can be used in ratio and percentage computations.
    #[inline]
    pub fn has_usable_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Calendar date of the bar in UTC.
    pub fn date(&self) -> NaiveDate {
        self.datetime().date_naive()
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }
}

/// Price history for one symbol, ascending by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, sorting bars ascending by timestamp.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// An empty series for a symbol with no price data.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    /// Append a bar. Callers are expected to push in timestamp order.
    pub fn push(&mut self, bar: Bar) {
        self.bars.push(bar);
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last N bars.
    pub fn last_n(&self, n: usize) -> &[Bar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Latest close, if the series has one.
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Mean close × volume over the last `n` bars. `None` when empty.
    pub fn avg_dollar_volume(&self, n: usize) -> Option<f64> {
        let window = self.last_n(n);
        if window.is_empty() {
            return None;
        }
        Some(window.iter().map(Bar::dollar_volume).sum::<f64>() / window.len() as f64)
    }

    /// Mean raw volume over the last `n` bars. `None` when empty.
    pub fn avg_volume(&self, n: usize) -> Option<f64> {
        let window = self.last_n(n);
        if window.is_empty() {
            return None;
        }
        Some(window.iter().map(|b| b.volume).sum::<f64>() / window.len() as f64)
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}
