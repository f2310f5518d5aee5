//! Momentum oscillator plus trend crossover strength.
//!
//! Strength combines two capped parts:
//! - RSI(14): +0.4 inside the 30..=70 band, -0.4 when overbought, -0.2 when
//!   oversold.
//! - Crossover: ±0.6 by the sign of EMA(12) - EMA(26) once 26 closes exist;
//!   before that, ±0.3 by the direction RSI moved over its last five readings.
//!
//! The reading also reports classic triggers (RSI leaving the oversold or
//! overbought zone, MACD crossing its signal line).

use serde::{Deserialize, Serialize};
use signal_core::traits::{Indicator, MultiOutputIndicator};
use signal_core::{Degraded, Scored};
use signal_indicators::{Ema, Macd, MacdOutput, Rsi};

const RSI_IN_BAND: f64 = 0.4;
const RSI_OVERBOUGHT: f64 = -0.4;
const RSI_OVERSOLD: f64 = -0.2;
const CROSSOVER_WEIGHT: f64 = 0.6;
const PROXY_WEIGHT: f64 = 0.3;
const PROXY_LOOKBACK: usize = 5;

/// Everything the technical scorer computed for one close series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReading {
    pub rsi: f64,
    pub rsi_component: f64,
    pub crossover_component: f64,
    pub fast_ema: Option<f64>,
    pub slow_ema: Option<f64>,
    pub macd: Option<MacdOutput>,
    /// RSI crossed up through the oversold level on the latest bar
    pub rsi_buy: bool,
    /// RSI crossed down through the overbought level on the latest bar
    pub rsi_sell: bool,
    /// MACD crossed above its signal line on the latest bar
    pub macd_buy: bool,
    /// Combined strength in [-1, 1]
    pub strength: f64,
}

#[derive(Debug, Clone)]
pub struct TechnicalScorer {
    rsi: Rsi,
    fast: Ema,
    slow: Ema,
    macd: Macd,
    oversold: f64,
    overbought: f64,
}

impl Default for TechnicalScorer {
    fn default() -> Self {
        Self {
            rsi: Rsi::new(14),
            fast: Ema::new(12),
            slow: Ema::new(26),
            macd: Macd::new(),
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl TechnicalScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a close series. `None` inside the result means "no technical
    /// view", which callers treat as 0.0.
    pub fn score(&self, closes: &[f64]) -> Scored<Option<TechnicalReading>> {
        if closes.iter().any(|c| !c.is_finite() || *c <= 0.0) {
            return Scored::neutral(Degraded::MissingInput {
                field: "close".into(),
            });
        }
        let rsi_values = self.rsi.calculate(closes);
        let Some(&rsi) = rsi_values.last() else {
            return Scored::neutral(Degraded::InsufficientData {
                required: self.rsi.period(),
                available: closes.len(),
            });
        };

        let rsi_component = self.rsi_component(rsi);

        let fast_ema = self.fast.latest(closes);
        let slow_ema = self.slow.latest(closes);
        let crossover_component = match (fast_ema, slow_ema) {
            (Some(fast), Some(slow)) => CROSSOVER_WEIGHT * sign(fast - slow),
            _ => {
                let base_idx = rsi_values.len().saturating_sub(PROXY_LOOKBACK);
                PROXY_WEIGHT * sign(rsi - rsi_values[base_idx])
            }
        };

        let prev_rsi = rsi_values.len().checked_sub(2).map(|i| rsi_values[i]);
        let rsi_buy = prev_rsi.is_some_and(|p| p < self.oversold && rsi >= self.oversold);
        let rsi_sell = prev_rsi.is_some_and(|p| p > self.overbought && rsi <= self.overbought);

        let macd_values = self.macd.calculate(closes);
        let macd = macd_values.last().copied();
        let macd_buy = match macd_values.as_slice() {
            [.., prev, last] => prev.histogram <= 0.0 && last.histogram > 0.0,
            _ => false,
        };

        let strength = (rsi_component + crossover_component).clamp(-1.0, 1.0);

        Scored::ok(Some(TechnicalReading {
            rsi,
            rsi_component,
            crossover_component,
            fast_ema,
            slow_ema,
            macd,
            rsi_buy,
            rsi_sell,
            macd_buy,
            strength,
        }))
    }

    fn rsi_component(&self, rsi: f64) -> f64 {
        if rsi > self.overbought {
            RSI_OVERBOUGHT
        } else if rsi < self.oversold {
            RSI_OVERSOLD
        } else {
            RSI_IN_BAND
        }
    }
}

impl TechnicalReading {
    /// Number of buy triggers on the latest bar.
    pub fn entry_triggers(&self) -> u8 {
        u8::from(self.rsi_buy) + u8::from(self.macd_buy)
    }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag_uptrend(n: usize) -> Vec<f64> {
        // +2, -1 pattern drifts up while keeping RSI inside the band
        let mut price = 100.0;
        (0..n)
            .map(|i| {
                price += if i % 2 == 0 { 2.0 } else { -1.0 };
                price
            })
            .collect()
    }

    #[test]
    fn test_insufficient_data_is_neutral() {
        let scored = TechnicalScorer::new().score(&[100.0; 10]);

        assert!(scored.value.is_none());
        assert!(matches!(
            scored.degraded,
            Some(Degraded::InsufficientData { required: 15, available: 10 })
        ));
        assert!(TechnicalScorer::new().score(&[]).value.is_none());
    }

    #[test]
    fn test_invalid_closes_are_neutral() {
        let mut closes = zigzag_uptrend(40);
        closes[5] = f64::NAN;

        let scored = TechnicalScorer::new().score(&closes);
        assert!(scored.value.is_none());
        assert!(scored.is_degraded());
    }

    #[test]
    fn test_rising_series_crossover_non_negative() {
        let scorer = TechnicalScorer::new();

        for n in [15, 20, 26, 40, 80] {
            let closes: Vec<f64> = (0..n).map(|i| 50.0 + i as f64).collect();
            let reading = scorer.score(&closes).value.unwrap();
            assert!(reading.crossover_component >= 0.0, "n = {n}");
            assert!(reading.strength.is_finite());
        }
    }

    #[test]
    fn test_monotonic_rise_is_overbought() {
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + i as f64).collect();
        let reading = TechnicalScorer::new().score(&closes).value.unwrap();

        assert!((reading.rsi - 100.0).abs() < 1e-10);
        assert!((reading.rsi_component - RSI_OVERBOUGHT).abs() < 1e-10);
        assert!((reading.crossover_component - CROSSOVER_WEIGHT).abs() < 1e-10);
        assert!((reading.strength - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_healthy_uptrend_is_strong() {
        let reading = TechnicalScorer::new()
            .score(&zigzag_uptrend(60))
            .value
            .unwrap();

        assert!(reading.rsi > 30.0 && reading.rsi < 70.0);
        assert!((reading.strength - 1.0).abs() < 1e-10);
        assert!(reading.macd.is_some());
    }

    #[test]
    fn test_decline_is_negative() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 - i as f64).collect();
        let reading = TechnicalScorer::new().score(&closes).value.unwrap();

        assert!((reading.strength + 0.8).abs() < 1e-10);
        assert!(!reading.rsi_buy);
    }

    #[test]
    fn test_rsi_buy_trigger() {
        // Long slide into oversold, then a sharp bounce
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let last = *closes.last().unwrap();
        closes.push(last + 15.0);

        let reading = TechnicalScorer::new().score(&closes).value.unwrap();
        assert!(reading.rsi_buy);
        assert!(!reading.rsi_sell);
        assert!(reading.entry_triggers() >= 1);
    }
}
