//! In-memory collaborators for tests and demos.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use signal_core::error::DataError;
use signal_core::traits::{FundamentalsSource, MarketData, TextSource};
use signal_core::types::{Bar, Fundamentals, TextRecord};

/// Fixed bars per symbol. Symbols registered with `failing` return a
/// connection error instead.
#[derive(Debug, Default)]
pub struct StaticMarketData {
    bars: HashMap<String, Vec<Bar>>,
    failing: HashSet<String>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.bars.insert(symbol.to_ascii_uppercase(), bars);
        self
    }

    pub fn failing(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_ascii_uppercase());
        self
    }
}

#[async_trait]
impl MarketData for StaticMarketData {
    async fn price_history(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>, DataError> {
        let key = symbol.to_ascii_uppercase();
        if self.failing.contains(&key) {
            return Err(DataError::ConnectionError(format!("{symbol} unavailable")));
        }
        let bars = self
            .bars
            .get(&key)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;
        let skip = bars.len().saturating_sub(lookback_days as usize);
        Ok(bars[skip..].to_vec())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// A fixed text corpus with a settable refresh time.
///
/// `refresh` stamps the corpus with the current time and counts the call.
#[derive(Debug, Default)]
pub struct StaticTexts {
    records: Vec<TextRecord>,
    refreshed_at: RwLock<Option<DateTime<Utc>>>,
    refresh_calls: AtomicUsize,
}

impl StaticTexts {
    pub fn new(records: Vec<TextRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn refreshed_at(mut self, at: DateTime<Utc>) -> Self {
        self.refreshed_at = RwLock::new(Some(at));
        self
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextSource for StaticTexts {
    async fn recent_texts(&self, symbol: &str, limit: usize) -> Result<Vec<TextRecord>, DataError> {
        let mut matching: Vec<TextRecord> = self
            .records
            .iter()
            .filter(|r| r.mentions(symbol))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at.read().ok().and_then(|slot| *slot)
    }

    async fn refresh(&self) -> Result<(), DataError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let mut slot = self
            .refreshed_at
            .write()
            .map_err(|e| DataError::Internal(e.to_string()))?;
        *slot = Some(Utc::now());
        Ok(())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Fixed fundamentals per symbol; unknown symbols are empty.
#[derive(Debug, Default)]
pub struct StaticFundamentals {
    by_symbol: HashMap<String, Fundamentals>,
}

impl StaticFundamentals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: &str, fundamentals: Fundamentals) -> Self {
        self.by_symbol.insert(symbol.to_ascii_uppercase(), fundamentals);
        self
    }
}

#[async_trait]
impl FundamentalsSource for StaticFundamentals {
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataError> {
        Ok(self
            .by_symbol
            .get(&symbol.to_ascii_uppercase())
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::TextOrigin;

    #[tokio::test]
    async fn test_static_market_data() {
        let bars: Vec<Bar> = (0..10)
            .map(|i| Bar::new(i, 1.0, 1.0, 1.0, 1.0 + i as f64, 100.0))
            .collect();
        let source = StaticMarketData::new()
            .with_bars("TQQQ", bars)
            .failing("SOXL");

        let recent = source.price_history("tqqq", 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert!((recent[2].close - 10.0).abs() < 1e-10);
        assert!(source.price_history("SOXL", 3).await.is_err());
        assert!(matches!(
            source.price_history("LABU", 3).await,
            Err(DataError::SymbolNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_static_texts_refresh() {
        let texts = StaticTexts::new(vec![TextRecord::new(
            Some("TQQQ".into()),
            Utc::now(),
            TextOrigin::Reddit,
            "moon",
        )]);

        assert!(texts.last_refreshed().await.is_none());
        texts.refresh().await.unwrap();
        assert!(texts.last_refreshed().await.is_some());
        assert_eq!(texts.refresh_calls(), 1);
        assert_eq!(texts.recent_texts("TQQQ", 5).await.unwrap().len(), 1);
    }
}
