//! Small-cap momentum scorer.
//!
//! Weighted blend of capped 5-period return (0.45), a breakout flag against
//! the 20-period high (0.30), the volume z-score (0.15) and text sentiment
//! (0.10), plus an additive catalyst boost (0.15 × catalyst share) that is
//! allowed to push the raw total past 1.0 before the final clamp.

use serde::{Deserialize, Serialize};
use signal_core::{
    error::StrategyError,
    traits::{BaseScorer, ScoringInput, StrategyConfig},
    types::StrategyKind,
};
use signal_indicators::{pct_change_last, Rolling};
use signal_scoring::{CatalystScorer, VolumeAnomaly};

/// Configuration for the small-cap momentum scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumSmallcapConfig {
    pub return_period: usize,
    pub breakout_window: usize,
    pub volume_window: usize,
    /// Observations required by the rolling high and volume statistics
    pub min_periods: usize,
    pub return_weight: f64,
    pub breakout_weight: f64,
    pub volume_weight: f64,
    pub sentiment_weight: f64,
    pub catalyst_boost: f64,
    /// Breakout term when the close is below the rolling high
    pub below_high_penalty: f64,
}

impl Default for MomentumSmallcapConfig {
    fn default() -> Self {
        Self {
            return_period: 5,
            breakout_window: 20,
            volume_window: 20,
            min_periods: 5,
            return_weight: 0.45,
            breakout_weight: 0.30,
            volume_weight: 0.15,
            sentiment_weight: 0.10,
            catalyst_boost: 0.15,
            below_high_penalty: -0.2,
        }
    }
}

impl StrategyConfig for MomentumSmallcapConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.return_period == 0 || self.breakout_window == 0 || self.volume_window == 0 {
            return Err(StrategyError::InvalidConfig(
                "Periods must be greater than 0".into(),
            ));
        }
        if self.min_periods > self.breakout_window || self.min_periods > self.volume_window {
            return Err(StrategyError::InvalidConfig(
                "Minimum periods cannot exceed the windows".into(),
            ));
        }
        Ok(())
    }
}

/// Small-cap momentum base scorer.
#[derive(Debug, Clone)]
pub struct MomentumSmallcapScorer {
    config: MomentumSmallcapConfig,
    high: Rolling,
    volume: VolumeAnomaly,
    catalyst: CatalystScorer,
}

impl MomentumSmallcapScorer {
    pub fn new(config: MomentumSmallcapConfig, catalyst: CatalystScorer) -> Self {
        Self {
            high: Rolling::new(config.breakout_window, config.min_periods),
            volume: VolumeAnomaly::new(config.volume_window, config.min_periods),
            config,
            catalyst,
        }
    }

    /// Breakout term: +1 at or above the rolling high, else the penalty.
    fn breakout(&self, closes: &[f64]) -> Option<f64> {
        let last = *closes.last()?;
        let high = self.high.max_last(closes)?;
        Some(if last >= high {
            1.0
        } else {
            self.config.below_high_penalty
        })
    }
}

impl BaseScorer for MomentumSmallcapScorer {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MomentumSmallcap
    }

    fn description(&self) -> &str {
        "Return, breakout, volume surge and sentiment with a catalyst boost"
    }

    fn warmup_period(&self) -> usize {
        self.config.min_periods
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
        let Some(breakout) = self.breakout(&closes) else {
            return 0.0;
        };

        let ret = pct_change_last(&closes, self.config.return_period).unwrap_or(0.0);
        let ret = (ret * 10.0).clamp(-1.0, 1.0);
        let volume = self.volume.strength(&series.volumes()).value;
        let sentiment = if input.sentiment.is_finite() {
            input.sentiment.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let catalyst = self.catalyst.score(input.texts);

        let raw = self.config.return_weight * ret
            + self.config.breakout_weight * breakout
            + self.config.volume_weight * volume
            + self.config.sentiment_weight * sentiment
            + self.config.catalyst_boost * catalyst;

        raw.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::{Bar, BarSeries};

    fn scorer() -> MomentumSmallcapScorer {
        MomentumSmallcapScorer::new(
            MomentumSmallcapConfig::default(),
            CatalystScorer::new().unwrap(),
        )
    }

    fn series(closes: &[f64], volumes: &[f64]) -> BarSeries {
        let bars = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&c, &v))| Bar::new(i as i64, c, c, c, c, v))
            .collect();
        BarSeries::new("ABCD", bars)
    }

    #[test]
    fn test_empty_is_zero() {
        let empty = BarSeries::empty("ABCD");
        assert_eq!(scorer().score(&ScoringInput::prices(&empty)), 0.0);
    }

    #[test]
    fn test_short_history_is_zero() {
        let s = series(&[1.0, 1.1, 1.2, 1.3], &[100.0; 4]);
        assert_eq!(scorer().score(&ScoringInput::prices(&s)), 0.0);
    }

    #[test]
    fn test_breakout_with_flat_volume() {
        // Ten flat days then a 10% pop to a new high, volume unchanged
        let mut closes = vec![2.0; 10];
        closes.push(2.2);
        let s = series(&closes, &[1_000.0; 11]);

        let score = scorer().score(&ScoringInput::prices(&s));
        // 0.45 * clamp(0.1 * 10) + 0.30 * 1
        assert!((score - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_below_high_penalty() {
        let mut closes = vec![2.0; 10];
        closes[3] = 3.0;
        let s = series(&closes, &[1_000.0; 10]);

        let score = scorer().score(&ScoringInput::prices(&s));
        assert!((score - 0.3 * -0.2).abs() < 1e-10);
    }

    #[test]
    fn test_catalyst_boost_is_additive() {
        let mut closes = vec![2.0; 10];
        closes.push(2.2);
        let s = series(&closes, &[1_000.0; 11]);
        let texts = vec![
            "FDA approval announced".to_string(),
            "nothing to see".to_string(),
        ];
        let input = ScoringInput {
            series: &s,
            sentiment: 0.5,
            texts: &texts,
        };

        // 0.75 + 0.10 * 0.5 + 0.15 * 0.5
        assert!((scorer().score(&input) - 0.875).abs() < 1e-10);
    }

    #[test]
    fn test_total_clamped() {
        let mut closes = vec![2.0; 10];
        closes.push(3.0);
        let mut volumes = vec![1_000.0, 1_100.0, 900.0, 1_050.0, 950.0, 1_000.0, 980.0, 1_020.0, 990.0, 1_010.0];
        volumes.push(50_000.0);
        let s = series(&closes, &volumes);
        let texts = vec!["merger".to_string()];
        let input = ScoringInput {
            series: &s,
            sentiment: 1.0,
            texts: &texts,
        };

        assert!((scorer().score(&input) - 1.0).abs() < 1e-10);
    }
}
