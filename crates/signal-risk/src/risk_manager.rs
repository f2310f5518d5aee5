//! Unified trade plan and sizing for a symbol that passed the gates.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use signal_core::types::{BarSeries, RiskPlan};
use signal_indicators::Atr;

use crate::{PositionSizer, TradePlanner};

/// Risk configuration. Percentages are fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    pub account_equity: Decimal,
    pub max_risk_pct_per_trade: Decimal,
    pub atr_period: usize,
    /// ATR multiple treated as the per-share risk
    pub atr_k: Decimal,
    pub stop_loss_pct: Decimal,
    pub take_profit_pct: Decimal,
    pub trail_pct: Decimal,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            account_equity: dec!(100000),
            max_risk_pct_per_trade: dec!(0.01),
            atr_period: 14,
            atr_k: dec!(2),
            stop_loss_pct: dec!(0.08),
            take_profit_pct: dec!(0.20),
            trail_pct: dec!(0.08),
        }
    }
}

/// What the risk manager produced for one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSetup {
    pub entry_price: f64,
    pub risk_plan: Option<RiskPlan>,
    pub position_size: Decimal,
    pub atr: Option<f64>,
}

impl TradeSetup {
    /// No plan, no size.
    pub fn empty(entry_price: f64) -> Self {
        Self {
            entry_price,
            risk_plan: None,
            position_size: Decimal::ZERO,
            atr: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RiskManager {
    atr: Atr,
    planner: TradePlanner,
    sizer: PositionSizer,
}

impl Default for RiskManager {
    fn default() -> Self {
        Self::new(&RiskSettings::default())
    }
}

impl RiskManager {
    pub fn new(settings: &RiskSettings) -> Self {
        Self {
            atr: Atr::new(settings.atr_period.max(1)),
            planner: TradePlanner::new(
                settings.stop_loss_pct,
                settings.take_profit_pct,
                settings.trail_pct,
            ),
            sizer: PositionSizer::new(
                settings.account_equity,
                settings.max_risk_pct_per_trade,
                settings.atr_k,
            ),
        }
    }

    /// Plan a long entry at the latest close.
    ///
    /// A missing or non-positive entry yields an empty setup; a missing ATR
    /// keeps the plan but sizes to zero.
    pub fn assess(&self, series: &BarSeries) -> TradeSetup {
        let entry = series.last_close().unwrap_or(0.0);
        let Some(plan) = self.planner.plan(entry) else {
            return TradeSetup::empty(if entry.is_finite() { entry } else { 0.0 });
        };

        let atr = self.atr.latest_for(series);
        TradeSetup {
            entry_price: entry,
            risk_plan: Some(plan),
            position_size: self.sizer.size(atr),
            atr,
        }
    }
}
