//! Strategy registry for looking up base scorers by kind.

use crate::{LeveragedEtfConfig, LeveragedEtfScorer, MomentumSmallcapConfig, MomentumSmallcapScorer};
use serde::{Deserialize, Serialize};
use signal_core::{
    error::StrategyError,
    traits::{BaseScorer, StrategyConfig},
    types::StrategyKind,
};
use signal_scoring::CatalystScorer;

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    pub kind: StrategyKind,
    /// Human-readable name
    pub name: String,
    pub description: String,
    /// Whether callers must supply symbols
    pub requires_symbols: bool,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry of the available base scorers.
pub struct StrategyRegistry {
    strategies: Vec<StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a registry with every built-in strategy.
    pub fn new() -> Result<Self, StrategyError> {
        let strategies = vec![
            StrategyInfo {
                kind: StrategyKind::LeveragedEtf,
                name: "Leveraged ETF Momentum".to_string(),
                description: "Moving-average cross and short-term momentum for 3x ETFs"
                    .to_string(),
                requires_symbols: StrategyKind::LeveragedEtf.requires_symbols(),
                default_config: to_json(&LeveragedEtfConfig::default())?,
            },
            StrategyInfo {
                kind: StrategyKind::MomentumSmallcap,
                name: "Small-cap Momentum".to_string(),
                description: "Return, breakout, volume surge, sentiment and catalyst boost"
                    .to_string(),
                requires_symbols: StrategyKind::MomentumSmallcap.requires_symbols(),
                default_config: to_json(&MomentumSmallcapConfig::default())?,
            },
        ];

        Ok(Self { strategies })
    }

    /// List all available strategies.
    pub fn list(&self) -> &[StrategyInfo] {
        &self.strategies
    }

    /// Get strategy info by kind.
    pub fn get(&self, kind: StrategyKind) -> Option<&StrategyInfo> {
        self.strategies.iter().find(|s| s.kind == kind)
    }

    /// Create a scorer from a JSON configuration.
    pub fn create(
        &self,
        kind: StrategyKind,
        config: serde_json::Value,
    ) -> Result<Box<dyn BaseScorer>, StrategyError> {
        match kind {
            StrategyKind::LeveragedEtf => {
                let config: LeveragedEtfConfig = from_json(config)?;
                config.validate()?;
                Ok(Box::new(LeveragedEtfScorer::new(config)))
            }
            StrategyKind::MomentumSmallcap => {
                let config: MomentumSmallcapConfig = from_json(config)?;
                config.validate()?;
                let catalyst = CatalystScorer::new()
                    .map_err(|e| StrategyError::InvalidConfig(format!("catalyst patterns: {e}")))?;
                Ok(Box::new(MomentumSmallcapScorer::new(config, catalyst)))
            }
        }
    }

    /// Create a scorer with its default configuration.
    pub fn create_default(&self, kind: StrategyKind) -> Result<Box<dyn BaseScorer>, StrategyError> {
        let info = self
            .get(kind)
            .ok_or_else(|| StrategyError::NotFound(kind.to_string()))?;
        self.create(kind, info.default_config.clone())
    }
}

fn to_json<T: Serialize>(config: &T) -> Result<serde_json::Value, StrategyError> {
    serde_json::to_value(config).map_err(|e| StrategyError::InvalidConfig(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, StrategyError> {
    serde_json::from_value(value).map_err(|e| StrategyError::InvalidConfig(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = StrategyRegistry::new().unwrap();
        assert_eq!(registry.list().len(), 2);
        assert!(registry.get(StrategyKind::MomentumSmallcap).unwrap().requires_symbols);
    }

    #[test]
    fn test_create_default() {
        let registry = StrategyRegistry::new().unwrap();

        let scorer = registry.create_default(StrategyKind::LeveragedEtf).unwrap();
        assert_eq!(scorer.name(), "leveraged_etf");
        assert_eq!(scorer.kind(), StrategyKind::LeveragedEtf);
    }

    #[test]
    fn test_create_with_partial_config() {
        let registry = StrategyRegistry::new().unwrap();

        // Missing fields fall back to defaults
        let config = serde_json::json!({ "fast_period": 3, "fast_min_periods": 2 });
        let scorer = registry.create(StrategyKind::LeveragedEtf, config).unwrap();
        assert_eq!(scorer.warmup_period(), 5);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let registry = StrategyRegistry::new().unwrap();

        let config = serde_json::json!({ "return_period": 0 });
        assert!(registry.create(StrategyKind::MomentumSmallcap, config).is_err());

        let config = serde_json::json!({ "fast_period": "five" });
        assert!(registry.create(StrategyKind::LeveragedEtf, config).is_err());
    }
}
