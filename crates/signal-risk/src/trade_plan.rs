//! Fixed-percentage stop, first target and trailing distance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use signal_core::types::RiskPlan;

#[derive(Debug, Clone, Copy)]
pub struct TradePlanner {
    stop_loss_pct: Decimal,
    take_profit_pct: Decimal,
    trail_pct: Decimal,
}

impl Default for TradePlanner {
    fn default() -> Self {
        Self::new(dec!(0.08), dec!(0.20), dec!(0.08))
    }
}

impl TradePlanner {
    /// All percentages are fractions of the entry price.
    pub fn new(stop_loss_pct: Decimal, take_profit_pct: Decimal, trail_pct: Decimal) -> Self {
        Self {
            stop_loss_pct,
            take_profit_pct,
            trail_pct,
        }
    }

    /// Plan for a long entry, prices rounded to 4 dp.
    ///
    /// `None` when the entry is not a positive finite price.
    pub fn plan(&self, entry: f64) -> Option<RiskPlan> {
        if !(entry.is_finite() && entry > 0.0) {
            return None;
        }
        let entry = Decimal::try_from(entry).ok()?;

        Some(RiskPlan {
            stop_loss: (entry * (Decimal::ONE - self.stop_loss_pct)).round_dp(4),
            take_profit_1: (entry * (Decimal::ONE + self.take_profit_pct)).round_dp(4),
            trail_after_tp1: self.trail_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let plan = TradePlanner::default().plan(50.0).unwrap();

        assert_eq!(plan.stop_loss, dec!(46));
        assert_eq!(plan.take_profit_1, dec!(60));
        assert_eq!(plan.trail_after_tp1, dec!(0.08));
    }

    #[test]
    fn test_prices_are_rounded() {
        let planner = TradePlanner::new(dec!(0.05), dec!(0.15), dec!(0.1));
        let plan = planner.plan(12.34567).unwrap();

        // 12.34567 × 0.95 = 11.7283865, × 1.15 = 14.1975205
        assert_eq!(plan.stop_loss, dec!(11.7284));
        assert_eq!(plan.take_profit_1, dec!(14.1975));
    }

    #[test]
    fn test_no_plan_without_price() {
        let planner = TradePlanner::default();
        assert!(planner.plan(0.0).is_none());
        assert!(planner.plan(-3.0).is_none());
        assert!(planner.plan(f64::NAN).is_none());
    }
}
