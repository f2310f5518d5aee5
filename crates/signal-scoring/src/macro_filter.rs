//! Market-wide risk gate from a volatility index and broad-index momentum.

use serde::{Deserialize, Serialize};
use signal_core::{Degraded, Scored};
use signal_indicators::trailing_return;
use tracing::debug;

/// Regime reading. All zeros is the neutral default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroSignal {
    /// +1 calm, 0 normal, -1 stressed
    pub vix_signal: i8,
    /// +1 rallying, 0 flat, -1 selling off
    pub momentum_signal: i8,
    /// 0.6 × vix_signal + 0.4 × momentum_signal
    pub combined_score: f64,
    pub vix_level: f64,
    pub momentum_return: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct MacroFilter {
    vix_calm: f64,
    vix_stressed: f64,
    momentum_band: f64,
    momentum_lookback: usize,
}

impl Default for MacroFilter {
    fn default() -> Self {
        Self {
            vix_calm: 15.0,
            vix_stressed: 25.0,
            momentum_band: 0.02,
            momentum_lookback: 5,
        }
    }
}

impl MacroFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the regime from volatility-index closes and broad-index closes.
    ///
    /// Each half falls back to 0 independently when its series is unusable;
    /// the first missing half is reported as the degradation reason.
    pub fn evaluate(&self, vix_closes: &[f64], index_closes: &[f64]) -> Scored<MacroSignal> {
        let mut degraded = None;

        let vix_level = vix_closes.last().copied().filter(|v| v.is_finite() && *v > 0.0);
        let vix_signal = match vix_level {
            Some(level) if level < self.vix_calm => 1,
            Some(level) if level < self.vix_stressed => 0,
            Some(_) => -1,
            None => {
                degraded = Some(Degraded::MissingInput {
                    field: "volatility_index".into(),
                });
                0
            }
        };

        let momentum_return = trailing_return(index_closes, self.momentum_lookback);
        let momentum_signal = match momentum_return {
            Some(r) if r > self.momentum_band => 1,
            Some(r) if r < -self.momentum_band => -1,
            Some(_) => 0,
            None => {
                degraded.get_or_insert(Degraded::InsufficientData {
                    required: self.momentum_lookback,
                    available: index_closes.len(),
                });
                0
            }
        };

        let signal = MacroSignal {
            vix_signal,
            momentum_signal,
            combined_score: 0.6 * f64::from(vix_signal) + 0.4 * f64::from(momentum_signal),
            vix_level: vix_level.unwrap_or(0.0),
            momentum_return: momentum_return.unwrap_or(0.0),
        };
        debug!(?signal, "macro regime evaluated");

        Scored {
            value: signal,
            degraded,
        }
    }
}
