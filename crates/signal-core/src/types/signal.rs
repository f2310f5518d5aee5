//! Combined per-symbol signals and their flattened snapshot rows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::FilterKind;
use crate::error::{SignalError, StrategyError};
use crate::outcome::Degraded;

/// Discrete recommendation derived from the enhanced score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    StrongBuy,
    Buy,
    #[default]
    Hold,
    Sell,
    StrongSell,
}

impl Action {
    /// Map a score in [-1, 1] onto an action using symmetric thresholds.
    ///
    /// `strong` must be at least `weak`; both are magnitudes.
    pub fn from_strength(strength: f64, strong: f64, weak: f64) -> Self {
        if !strength.is_finite() {
            return Action::Hold;
        }
        if strength >= strong {
            Action::StrongBuy
        } else if strength >= weak {
            Action::Buy
        } else if strength <= -strong {
            Action::StrongSell
        } else if strength <= -weak {
            Action::Sell
        } else {
            Action::Hold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::StrongBuy => "STRONG_BUY",
            Action::Buy => "BUY",
            Action::Hold => "HOLD",
            Action::Sell => "SELL",
            Action::StrongSell => "STRONG_SELL",
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Action::StrongBuy | Action::Buy)
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, Action::StrongSell | Action::Sell)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The strategies a caller can request signals for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    LeveragedEtf,
    MomentumSmallcap,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::LeveragedEtf, StrategyKind::MomentumSmallcap];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::LeveragedEtf => "leveraged_etf",
            StrategyKind::MomentumSmallcap => "momentum_smallcap",
        }
    }

    /// Whether the caller must name the symbols to score.
    ///
    /// The leveraged-ETF strategy falls back to a configured universe.
    pub fn requires_symbols(&self) -> bool {
        matches!(self, StrategyKind::MomentumSmallcap)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "leveraged_etf" => Ok(StrategyKind::LeveragedEtf),
            "momentum_smallcap" => Ok(StrategyKind::MomentumSmallcap),
            other => Err(StrategyError::NotFound(other.to_string())),
        }
    }
}

/// Stop, first target and trailing distance for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPlan {
    pub stop_loss: Decimal,
    pub take_profit_1: Decimal,
    /// Trailing stop distance (fraction) once the first target is hit
    pub trail_after_tp1: Decimal,
}

/// Observability fields attached to every signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalMeta {
    pub filters: Vec<FilterKind>,
    pub sector: Option<String>,
    pub last_earnings_date: Option<NaiveDate>,
    /// Fraction of recent texts carrying a catalyst
    pub catalyst_score: f64,
    /// Relative strength of the sector this instrument levers, if tracked
    pub sector_score: Option<f64>,
    /// Tier (1 to 3) of a volume spike on the latest bar
    pub volume_spike_tier: Option<u8>,
    /// Buy triggers firing on the latest bar (RSI leaving oversold, MACD
    /// crossing its signal line)
    pub entry_triggers: u8,
    /// Inputs that fell back to neutral values
    pub degraded: Vec<Degraded>,
    /// Set when the symbol's pipeline failed and the row was zeroed
    pub error: Option<String>,
}

/// Terminal per-symbol output of the combiner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSignal {
    pub symbol: String,
    pub strategy: StrategyKind,
    /// Base strategy score
    pub strength: f64,
    pub action: Action,
    pub enhanced_strength: f64,
    pub confidence: f64,
    pub sentiment_score: f64,
    pub volume_score: f64,
    pub technical_score: f64,
    pub macro_score: f64,
    pub etf_premium_score: f64,
    pub entry_price: f64,
    /// `None` for rejected or unpriced symbols
    pub risk_plan: Option<RiskPlan>,
    pub position_size: Decimal,
    pub atr: Option<f64>,
    pub meta: SignalMeta,
    pub generated_at: DateTime<Utc>,
}

impl CombinedSignal {
    /// A zeroed HOLD row.
    pub fn neutral(symbol: impl Into<String>, strategy: StrategyKind, at: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            strategy,
            strength: 0.0,
            action: Action::Hold,
            enhanced_strength: 0.0,
            confidence: 0.0,
            sentiment_score: 0.0,
            volume_score: 0.0,
            technical_score: 0.0,
            macro_score: 0.0,
            etf_premium_score: 0.0,
            entry_price: 0.0,
            risk_plan: None,
            position_size: Decimal::ZERO,
            atr: None,
            meta: SignalMeta::default(),
            generated_at: at,
        }
    }

    /// A zeroed HOLD row recording why the pipeline failed.
    pub fn failed(
        symbol: impl Into<String>,
        strategy: StrategyKind,
        at: DateTime<Utc>,
        error: impl fmt::Display,
    ) -> Self {
        let mut signal = Self::neutral(symbol, strategy, at);
        signal.meta.error = Some(error.to_string());
        signal
    }

    /// True when no gate rejected the symbol.
    pub fn passed_filters(&self) -> bool {
        self.meta.filters.is_empty() && self.meta.error.is_none()
    }

    /// Flatten to scalar columns for tabular snapshots.
    pub fn to_row(&self) -> Result<SignalRow, SignalError> {
        let meta_json = serde_json::to_string(&self.meta)
            .map_err(|e| SignalError::Serialization(e.to_string()))?;
        let filters = self
            .meta
            .filters
            .iter()
            .map(FilterKind::as_str)
            .collect::<Vec<_>>()
            .join(";");

        Ok(SignalRow {
            symbol: self.symbol.clone(),
            strategy: self.strategy.as_str().to_string(),
            action: self.action.as_str().to_string(),
            strength: self.strength,
            enhanced_strength: self.enhanced_strength,
            confidence: self.confidence,
            sentiment_score: self.sentiment_score,
            volume_score: self.volume_score,
            technical_score: self.technical_score,
            macro_score: self.macro_score,
            etf_premium_score: self.etf_premium_score,
            entry_price: self.entry_price,
            stop_loss: self.risk_plan.map(|p| p.stop_loss),
            take_profit_1: self.risk_plan.map(|p| p.take_profit_1),
            trail_after_tp1: self.risk_plan.map(|p| p.trail_after_tp1),
            position_size: self.position_size,
            atr: self.atr,
            filters,
            sector: self.meta.sector.clone(),
            last_earnings_date: self.meta.last_earnings_date,
            meta: meta_json,
            generated_at: self.generated_at,
        })
    }
}

/// One snapshot row: a [`CombinedSignal`] with nested parts flattened.
///
/// `meta` holds the full [`SignalMeta`] as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub symbol: String,
    pub strategy: String,
    pub action: String,
    pub strength: f64,
    pub enhanced_strength: f64,
    pub confidence: f64,
    pub sentiment_score: f64,
    pub volume_score: f64,
    pub technical_score: f64,
    pub macro_score: f64,
    pub etf_premium_score: f64,
    pub entry_price: f64,
    pub stop_loss: Option<Decimal>,
    pub take_profit_1: Option<Decimal>,
    pub trail_after_tp1: Option<Decimal>,
    pub position_size: Decimal,
    pub atr: Option<f64>,
    pub filters: String,
    pub sector: Option<String>,
    pub last_earnings_date: Option<NaiveDate>,
    pub meta: String,
    pub generated_at: DateTime<Utc>,
}
