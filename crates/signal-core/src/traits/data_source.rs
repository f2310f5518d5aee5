//! Collaborator traits for price, text and fundamentals data.
//!
//! The pipeline never fetches anything itself. Implementations live in
//! `signal-data`; the engine wraps every call in a timeout and treats
//! failures as neutral inputs.

use crate::error::DataError;
use crate::types::{Bar, Fundamentals, TextRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Daily price history.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch up to `lookback_days` most recent daily bars.
    ///
    /// # Returns
    /// A vector of bars ordered from oldest to newest
    async fn price_history(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

/// Recent social/news text.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Most recent texts about `symbol`, newest first, at most `limit`.
    async fn recent_texts(&self, symbol: &str, limit: usize) -> Result<Vec<TextRecord>, DataError>;

    /// When the underlying dataset was last refreshed, if known.
    async fn last_refreshed(&self) -> Option<DateTime<Utc>>;

    /// Ask ingestion to refresh the dataset.
    async fn refresh(&self) -> Result<(), DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

/// Sector and earnings metadata.
#[async_trait]
pub trait FundamentalsSource: Send + Sync {
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataError>;

    fn name(&self) -> &str;
}
