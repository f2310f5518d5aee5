//! Engine configuration.

use serde::{Deserialize, Serialize};
use signal_core::error::SignalError;
use signal_risk::{FilterSettings, RiskSettings};
use signal_scoring::{default_pairs, default_sectors, EtfPair, SectorProxy};

/// Batch orchestration and action thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Text dataset older than this triggers a refresh before scoring
    pub max_text_age_minutes: i64,
    /// Upper bound on any single collaborator call
    pub provider_timeout_ms: u64,
    /// Symbols evaluated concurrently
    pub max_concurrency: usize,
    /// Symbols scored when a leveraged-ETF request names none
    pub default_universe: Vec<String>,
    pub strong_threshold: f64,
    pub weak_threshold: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_text_age_minutes: 30,
            provider_timeout_ms: 10_000,
            max_concurrency: 4,
            default_universe: vec!["TQQQ".into(), "SOXL".into(), "LABU".into()],
            strong_threshold: 0.6,
            weak_threshold: 0.3,
        }
    }
}

/// Market-wide inputs computed once per batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    pub vix_symbol: String,
    /// Broad index whose short-term return feeds the macro filter
    pub momentum_symbol: String,
    pub sector_benchmark: String,
    pub sector_lookback: usize,
    pub sectors: Vec<SectorProxy>,
    pub etf_pairs: Vec<EtfPair>,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            vix_symbol: "^VIX".into(),
            momentum_symbol: "QQQ".into(),
            sector_benchmark: "SPY".into(),
            sector_lookback: 10,
            sectors: default_sectors(),
            etf_pairs: default_pairs(),
        }
    }
}

/// Everything [`crate::SignalEngine`] needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub engine: EngineSettings,
    pub filters: FilterSettings,
    pub risk: RiskSettings,
    pub market: MarketSettings,
    /// Daily bars requested per symbol
    pub lookback_days: u32,
    /// Recent texts requested per symbol
    pub text_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            filters: FilterSettings::default(),
            risk: RiskSettings::default(),
            market: MarketSettings::default(),
            lookback_days: 60,
            text_limit: 50,
        }
    }
}

impl EngineConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), SignalError> {
        let e = &self.engine;
        if !(e.weak_threshold > 0.0 && e.weak_threshold <= e.strong_threshold && e.strong_threshold <= 1.0) {
            return Err(SignalError::Config(format!(
                "thresholds must satisfy 0 < weak ({}) <= strong ({}) <= 1",
                e.weak_threshold, e.strong_threshold
            )));
        }
        if e.max_concurrency == 0 {
            return Err(SignalError::Config("max_concurrency must be at least 1".into()));
        }
        if e.provider_timeout_ms == 0 {
            return Err(SignalError::Config("provider_timeout_ms must be positive".into()));
        }
        if self.lookback_days == 0 {
            return Err(SignalError::Config("lookback_days must be positive".into()));
        }
        if self.market.sector_lookback < 2 {
            return Err(SignalError::Config("sector_lookback must be at least 2".into()));
        }

        let r = &self.risk;
        let fractions = [
            ("max_risk_pct_per_trade", r.max_risk_pct_per_trade),
            ("stop_loss_pct", r.stop_loss_pct),
            ("trail_pct", r.trail_pct),
        ];
        for (name, value) in fractions {
            if value.is_sign_negative() || value >= rust_decimal::Decimal::ONE {
                return Err(SignalError::Config(format!(
                    "risk.{name} must be a fraction in [0, 1), got {value}"
                )));
            }
        }
        if r.take_profit_pct.is_sign_negative() {
            return Err(SignalError::Config("risk.take_profit_pct must not be negative".into()));
        }
        if r.atr_period == 0 {
            return Err(SignalError::Config("risk.atr_period must be positive".into()));
        }

        if self.filters.earnings_window_days < 0 {
            return Err(SignalError::Config(
                "filters.earnings_window_days must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.default_universe, vec!["TQQQ", "SOXL", "LABU"]);
        assert_eq!(config.market.etf_pairs.len(), 3);
    }

    #[test]
    fn test_invalid_thresholds() {
        let mut config = EngineConfig::default();
        config.engine.weak_threshold = 0.7;
        assert!(matches!(config.validate(), Err(SignalError::Config(_))));
    }

    #[test]
    fn test_percent_instead_of_fraction() {
        let mut config = EngineConfig::default();
        config.risk.stop_loss_pct = dec!(8);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"engine": {"max_concurrency": 8}, "lookback_days": 90}"#).unwrap();

        assert_eq!(config.engine.max_concurrency, 8);
        assert_eq!(config.engine.max_text_age_minutes, 30);
        assert_eq!(config.lookback_days, 90);
        assert_eq!(config.text_limit, 50);
    }
}
