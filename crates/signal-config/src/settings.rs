//! Configuration structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use signal_engine::{EngineConfig, EngineSettings, MarketSettings};
use signal_risk::{FilterSettings, RiskSettings};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub filters: FilterSettings,
    #[serde(default)]
    pub risk: RiskSettings,
    #[serde(default)]
    pub market: MarketSettings,
}

impl AppConfig {
    /// The subset the signal engine consumes.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            engine: self.engine.clone(),
            filters: self.filters.clone(),
            risk: self.risk.clone(),
            market: self.market.clone(),
            lookback_days: self.data.lookback_days,
            text_limit: self.data.text_limit,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Daily rolling log file, in addition to stdout
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingSettings {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Where the file-backed collaborators read and snapshots are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// One `<SYMBOL>.csv` of daily bars per symbol
    pub price_dir: PathBuf,
    /// Text corpus written by ingestion
    pub texts_path: PathBuf,
    /// `symbol,sector,last_earnings_date`
    pub fundamentals_path: PathBuf,
    pub output_dir: PathBuf,
    pub lookback_days: u32,
    pub text_limit: usize,
    /// 0 disables the fundamentals cache
    pub fundamentals_ttl_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            price_dir: PathBuf::from("data/prices"),
            texts_path: PathBuf::from("data/trading_data_latest.csv"),
            fundamentals_path: PathBuf::from("data/fundamentals.csv"),
            output_dir: PathBuf::from("data/signals"),
            lookback_days: 60,
            text_limit: 50,
            fundamentals_ttl_secs: 3600,
        }
    }
}
