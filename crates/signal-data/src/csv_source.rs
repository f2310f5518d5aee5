//! CSV-backed price and fundamentals collaborators.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use signal_core::error::DataError;
use signal_core::traits::{FundamentalsSource, MarketData};
use signal_core::types::{Bar, Fundamentals};
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Daily bars read from `<dir>/<SYMBOL>.csv`.
///
/// Index symbols keep their name without the leading caret, so `^VIX`
/// reads `VIX.csv`.
#[derive(Debug, Clone)]
pub struct CsvMarketData {
    dir: PathBuf,
}

impl CsvMarketData {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        let file = symbol.trim().trim_start_matches('^').to_ascii_uppercase();
        self.dir.join(format!("{file}.csv"))
    }
}

#[async_trait]
impl MarketData for CsvMarketData {
    async fn price_history(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataError::SymbolNotFound(symbol.to_string()));
            }
            Err(e) => return Err(DataError::Internal(format!("{}: {e}", path.display()))),
        };

        let mut bars = parse_bars(&content)?;
        let keep = lookback_days as usize;
        if bars.len() > keep {
            bars.drain(..bars.len() - keep);
        }
        debug!(symbol, bars = bars.len(), "loaded price history");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse OHLCV rows, sorted by timestamp.
pub fn parse_bars(content: &[u8]) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        let timestamp = parse_timestamp(&record.date)?;
        bars.push(Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

/// Parse various timestamp formats to epoch milliseconds.
pub fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let date_str = date_str.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }

    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp, milliseconds if more than 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[derive(Debug, Deserialize)]
struct FundamentalsRecord {
    #[serde(alias = "Symbol")]
    symbol: String,
    #[serde(alias = "Sector", default)]
    sector: Option<String>,
    #[serde(alias = "reportedDate", alias = "LastEarningsDate", default)]
    last_earnings_date: Option<String>,
}

/// Sector and earnings dates loaded once from a `symbol,sector,last_earnings_date` file.
///
/// Symbols absent from the file resolve to empty fundamentals.
#[derive(Debug, Clone, Default)]
pub struct CsvFundamentals {
    by_symbol: HashMap<String, Fundamentals>,
}

impl CsvFundamentals {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| DataError::Internal(format!("{}: {e}", path.display())))?;
        Self::parse(&content)
    }

    pub fn parse(content: &[u8]) -> Result<Self, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content);

        let mut by_symbol = HashMap::new();
        for result in reader.deserialize() {
            let record: FundamentalsRecord =
                result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let last_earnings_date = record
                .last_earnings_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(|d| {
                    NaiveDate::parse_from_str(d, "%Y-%m-%d")
                        .map_err(|e| DataError::ParseError(format!("{}: {e}", record.symbol)))
                })
                .transpose()?;
            by_symbol.insert(
                record.symbol.to_ascii_uppercase(),
                Fundamentals {
                    sector: record.sector.filter(|s| !s.is_empty()),
                    last_earnings_date,
                },
            );
        }
        Ok(Self { by_symbol })
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

#[async_trait]
impl FundamentalsSource for CsvFundamentals {
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataError> {
        Ok(self
            .by_symbol
            .get(&symbol.to_ascii_uppercase())
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "csv"
    }
}
