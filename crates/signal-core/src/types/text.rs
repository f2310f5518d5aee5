//! Normalized social/news text rows produced by ingestion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a text record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOrigin {
    Reddit,
    Twitter,
    News,
    #[serde(other)]
    Other,
}

impl std::str::FromStr for TextOrigin {
    type Err = std::convert::Infallible;

    /// Accepts bare names and ingestion tags such as `reddit_wallstreetbets`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let prefix = lower.split('_').next().unwrap_or_default();
        Ok(match prefix {
            "reddit" => TextOrigin::Reddit,
            "twitter" | "x" => TextOrigin::Twitter,
            "news" | "newsapi" => TextOrigin::News,
            _ => TextOrigin::Other,
        })
    }
}

/// One piece of free text about zero or more tickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Ticker the source tagged this text with, if any
    pub symbol: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub source: TextOrigin,
    pub text: String,
    /// Tickers found in the text body
    #[serde(default)]
    pub extracted_symbols: Vec<String>,
}

impl TextRecord {
    pub fn new(
        symbol: Option<String>,
        timestamp: DateTime<Utc>,
        source: TextOrigin,
        text: impl Into<String>,
    ) -> Self {
        Self {
            symbol,
            timestamp,
            source,
            text: text.into(),
            extracted_symbols: Vec::new(),
        }
    }

    pub fn with_extracted(mut self, symbols: Vec<String>) -> Self {
        self.extracted_symbols = symbols;
        self
    }

    /// Whether the record is about `symbol`, either by tag or by mention.
    pub fn mentions(&self, symbol: &str) -> bool {
        self.symbol
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(symbol))
            || self
                .extracted_symbols
                .iter()
                .any(|s| s.eq_ignore_ascii_case(symbol))
    }
}
