//! Leveraged ETF momentum scorer.
//!
//! Blends the direction of a fast/slow moving-average cross (weight 0.6)
//! with short-term percentage momentum scaled by ten and capped (weight 0.4).

use serde::{Deserialize, Serialize};
use signal_core::{
    error::StrategyError,
    traits::{BaseScorer, Indicator, ScoringInput, StrategyConfig},
    types::StrategyKind,
};
use signal_indicators::{pct_change_last, Sma};

/// Configuration for the leveraged ETF scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeveragedEtfConfig {
    /// Fast moving average period
    pub fast_period: usize,
    /// Observations required before the fast average is defined
    pub fast_min_periods: usize,
    /// Slow moving average period
    pub slow_period: usize,
    /// Observations required before the slow average is defined
    pub slow_min_periods: usize,
    /// Lookback for the percentage momentum
    pub momentum_period: usize,
    pub cross_weight: f64,
    pub momentum_weight: f64,
    /// Momentum is multiplied by this before capping to [-1, 1]
    pub momentum_scale: f64,
}

impl Default for LeveragedEtfConfig {
    fn default() -> Self {
        Self {
            fast_period: 5,
            fast_min_periods: 3,
            slow_period: 20,
            slow_min_periods: 5,
            momentum_period: 3,
            cross_weight: 0.6,
            momentum_weight: 0.4,
            momentum_scale: 10.0,
        }
    }
}

impl StrategyConfig for LeveragedEtfConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 || self.momentum_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Periods must be greater than 0".into(),
            ));
        }
        if self.fast_period >= self.slow_period {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be less than slow period".into(),
            ));
        }
        if self.fast_min_periods > self.fast_period || self.slow_min_periods > self.slow_period {
            return Err(StrategyError::InvalidConfig(
                "Minimum periods cannot exceed the window".into(),
            ));
        }
        Ok(())
    }
}

/// Leveraged ETF base scorer.
#[derive(Debug, Clone)]
pub struct LeveragedEtfScorer {
    config: LeveragedEtfConfig,
    fast: Sma,
    slow: Sma,
}

impl LeveragedEtfScorer {
    pub fn new(config: LeveragedEtfConfig) -> Self {
        Self {
            fast: Sma::new(config.fast_period.max(1)).min_periods(config.fast_min_periods),
            slow: Sma::new(config.slow_period.max(1)).min_periods(config.slow_min_periods),
            config,
        }
    }
}

impl Default for LeveragedEtfScorer {
    fn default() -> Self {
        Self::new(LeveragedEtfConfig::default())
    }
}

impl BaseScorer for LeveragedEtfScorer {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LeveragedEtf
    }

    fn description(&self) -> &str {
        "Fast/slow moving-average cross blended with capped short-term momentum"
    }

    fn warmup_period(&self) -> usize {
        self.config.slow_min_periods.max(self.config.fast_min_periods)
    }

    fn score(&self, input: &ScoringInput<'_>) -> f64 {
        let series = input.series;
        if !series.last().is_some_and(|b| b.has_usable_close()) {
            return 0.0;
        }
        let closes = series.closes();
        if closes.iter().any(|c| !c.is_finite()) {
            return 0.0;
        }

        let (Some(fast), Some(slow)) = (self.fast.latest(&closes), self.slow.latest(&closes)) else {
            return 0.0;
        };
        let cross = if fast > slow { 1.0 } else { -1.0 };

        let momentum = pct_change_last(&closes, self.config.momentum_period).unwrap_or(0.0);
        let momentum = (momentum * self.config.momentum_scale).clamp(-1.0, 1.0);

        (self.config.cross_weight * cross + self.config.momentum_weight * momentum).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::{Bar, BarSeries};

    fn series(closes: &[f64]) -> BarSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c, c, c, 1_000.0))
            .collect();
        BarSeries::new("TQQQ", bars)
    }

    fn score(closes: &[f64]) -> f64 {
        let series = series(closes);
        LeveragedEtfScorer::default().score(&ScoringInput::prices(&series))
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(score(&[]), 0.0);
    }

    #[test]
    fn test_too_short_is_zero() {
        assert_eq!(score(&[10.0, 11.0, 12.0, 13.0]), 0.0);
    }

    #[test]
    fn test_non_positive_close_is_zero() {
        assert_eq!(score(&[10.0, 11.0, 12.0, 13.0, 14.0, 0.0]), 0.0);
    }

    #[test]
    fn test_uptrend() {
        // +1% a day for 30 days
        let closes: Vec<f64> = (0..30).map(|i| 50.0 * 1.01f64.powi(i)).collect();
        let momentum = 1.01f64.powi(3) - 1.0;

        let expected = 0.6 + 0.4 * (momentum * 10.0);
        assert!((score(&closes) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_downtrend_is_negative() {
        let closes: Vec<f64> = (0..30).map(|i| 50.0 * 0.98f64.powi(i)).collect();
        let momentum = 0.98f64.powi(3) - 1.0;

        let expected = -0.6 + 0.4 * (momentum * 10.0);
        assert!((score(&closes) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_momentum_capped() {
        // A 50% jump over three bars saturates the momentum term
        let mut closes = vec![10.0; 20];
        closes.extend([12.0, 14.0, 15.0]);

        assert!((score(&closes) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_partial_windows() {
        // Six rising bars: the slow average is defined through its minimum periods
        let s = score(&[10.0, 10.1, 10.2, 10.3, 10.4, 10.5]);
        assert!(s > 0.6 && s <= 1.0);
    }

    #[test]
    fn test_equal_averages_count_as_bearish_cross() {
        // With exactly five bars both averages cover the same window
        let s = score(&[10.0, 10.1, 10.2, 10.3, 10.4]);
        assert!(s < 0.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(LeveragedEtfConfig::default().validate().is_ok());

        let bad = LeveragedEtfConfig {
            fast_period: 20,
            slow_period: 5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
