//! Base strategy scorer trait definitions.

use crate::error::StrategyError;
use crate::types::{BarSeries, StrategyKind};

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Everything a base scorer may look at for one symbol.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub series: &'a BarSeries,
    /// Mean text polarity for the symbol, in [-1, 1]
    pub sentiment: f64,
    /// Recent text bodies for the symbol
    pub texts: &'a [String],
}

impl<'a> ScoringInput<'a> {
    /// Price-only input with neutral sentiment and no texts.
    pub fn prices(series: &'a BarSeries) -> Self {
        Self {
            series,
            sentiment: 0.0,
            texts: &[],
        }
    }
}

/// A per-strategy base scorer.
///
/// Implementations are pure: the same input always yields the same score,
/// and unusable input yields exactly 0.0 rather than an error.
pub trait BaseScorer: Send + Sync {
    /// Which strategy this scorer implements.
    fn kind(&self) -> StrategyKind;

    /// Get the unique name of this scorer.
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    /// Base score in [-1, 1].
    fn score(&self, input: &ScoringInput<'_>) -> f64;

    /// Bars needed before the score is meaningful. Shorter series are not
    /// scored and count as 0.0.
    fn warmup_period(&self) -> usize;

    /// Check if enough bars are available.
    fn is_warmed_up(&self, bars_available: usize) -> bool {
        bars_available >= self.warmup_period()
    }

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }
}
