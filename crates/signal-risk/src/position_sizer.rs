//! Volatility-scaled position sizing.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Sizes a position so that a move of `atr_k` ATRs costs a fixed fraction of equity.
#[derive(Debug, Clone, Copy)]
pub struct PositionSizer {
    account_equity: Decimal,
    max_risk_pct: Decimal,
    atr_k: Decimal,
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self::new(dec!(100000), dec!(0.01), dec!(2))
    }
}

impl PositionSizer {
    /// `max_risk_pct` is a fraction (0.01 risks 1% of equity per trade).
    pub fn new(account_equity: Decimal, max_risk_pct: Decimal, atr_k: Decimal) -> Self {
        Self {
            account_equity,
            max_risk_pct,
            atr_k,
        }
    }

    /// Dollar amount put at risk by one trade.
    pub fn risk_budget(&self) -> Decimal {
        self.account_equity * self.max_risk_pct
    }

    /// Shares to hold: risk budget / (ATR × k), rounded toward zero at 4 dp.
    ///
    /// Zero whenever the ATR is missing, non-finite or not positive.
    pub fn size(&self, atr: Option<f64>) -> Decimal {
        let Some(atr) = atr.filter(|a| a.is_finite() && *a > 0.0) else {
            return Decimal::ZERO;
        };
        let Ok(atr) = Decimal::try_from(atr) else {
            return Decimal::ZERO;
        };

        let per_share_risk = atr * self.atr_k;
        if per_share_risk <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let budget = self.risk_budget();
        if budget <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        (budget / per_share_risk)
            .round_dp_with_strategy(4, RoundingStrategy::ToZero)
    }
}
