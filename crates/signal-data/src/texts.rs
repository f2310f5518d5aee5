//! Social/news text corpus backed by the ingestion CSV.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use signal_core::error::DataError;
use signal_core::traits::TextSource;
use signal_core::types::{TextOrigin, TextRecord};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::csv_source::parse_timestamp;
use crate::symbols::SymbolExtractor;

/// Columns written by ingestion: `symbol,timestamp,source,text[,url]`.
#[derive(Debug, Deserialize)]
struct TextCsvRecord {
    #[serde(default)]
    symbol: Option<String>,
    timestamp: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    text: String,
}

/// In-memory snapshot of the text CSV.
///
/// The file's modification time is the dataset's refresh time; `refresh`
/// re-reads the file, so an external ingestion job that rewrites it is
/// picked up on the next freshness check.
pub struct CsvTextStore {
    path: PathBuf,
    extractor: SymbolExtractor,
    records: RwLock<Option<Vec<TextRecord>>>,
}

impl CsvTextStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let extractor =
            SymbolExtractor::new().map_err(|e| DataError::Internal(e.to_string()))?;
        Ok(Self {
            path: path.into(),
            extractor,
            records: RwLock::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<TextRecord>, DataError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataError::NoDataAvailable);
            }
            Err(e) => return Err(DataError::Internal(format!("{}: {e}", self.path.display()))),
        };
        Ok(parse_texts(&content, &self.extractor))
    }
}

/// Parse text rows. Malformed rows and rows with unreadable timestamps are
/// logged and skipped.
pub fn parse_texts(content: &[u8], extractor: &SymbolExtractor) -> Vec<TextRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let row: TextCsvRecord = match result {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "skipping malformed text row");
                continue;
            }
        };
        let Ok(millis) = parse_timestamp(&row.timestamp) else {
            warn!(timestamp = %row.timestamp, "skipping text row with bad timestamp");
            continue;
        };
        let timestamp = DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH);
        let source = row.source.parse().unwrap_or(TextOrigin::Other);
        let symbol = row
            .symbol
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty());
        let extracted = extractor.extract(&row.text);

        records.push(TextRecord::new(symbol, timestamp, source, row.text).with_extracted(extracted));
    }
    records
}

#[async_trait]
impl TextSource for CsvTextStore {
    async fn recent_texts(&self, symbol: &str, limit: usize) -> Result<Vec<TextRecord>, DataError> {
        if self.records.read().await.is_none() {
            self.refresh().await?;
        }
        let guard = self.records.read().await;
        let Some(records) = guard.as_ref() else {
            return Ok(Vec::new());
        };

        let mut matching: Vec<TextRecord> = records
            .iter()
            .filter(|r| r.mentions(symbol))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(limit);
        debug!(symbol, texts = matching.len(), "matched recent texts");
        Ok(matching)
    }

    async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        let modified = tokio::fs::metadata(&self.path).await.ok()?.modified().ok()?;
        Some(DateTime::<Utc>::from(modified))
    }

    async fn refresh(&self) -> Result<(), DataError> {
        let records = self.load().await?;
        info!(path = %self.path.display(), records = records.len(), "text corpus loaded");
        *self.records.write().await = Some(records);
        Ok(())
    }

    fn name(&self) -> &str {
        "csv_texts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "symbol,timestamp,source,text,url\n\
        TQQQ,2024-05-10 14:00:00,reddit_wallstreetbets,TQQQ calls printing,\n\
        ,2024-05-10 15:00:00,news_reuters,\"Shares of SOXL stock jumped, $TQQQ too\",http://x\n\
        LABU,not-a-date,twitter_someone,ignored,\n\
        LABU,2024-05-09 09:30:00,twitter_someone,biotech bleeding,\n";

    #[test]
    fn test_parse_texts() {
        let extractor = SymbolExtractor::new().unwrap();
        let records = parse_texts(CORPUS.as_bytes(), &extractor);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].source, TextOrigin::Reddit);
        assert_eq!(records[1].symbol, None);
        assert_eq!(records[1].extracted_symbols, vec!["SOXL", "TQQQ"]);
        assert_eq!(records[2].source, TextOrigin::Twitter);
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let extractor = SymbolExtractor::new().unwrap();
        let corpus = "symbol,timestamp,source,text\n\
            TQQQ,2024-05-10 14:00:00,reddit_wsb,TQQQ calls printing\n\
            BROKEN\n\
            SOXL,2024-05-10 15:00:00,news_reuters,SOXL stock slides\n";

        let records = parse_texts(corpus.as_bytes(), &extractor);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol.as_deref(), Some("TQQQ"));
        assert_eq!(records[1].symbol.as_deref(), Some("SOXL"));
    }

    #[tokio::test]
    async fn test_recent_texts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texts.csv");
        std::fs::write(&path, CORPUS).unwrap();

        let store = CsvTextStore::new(&path).unwrap();
        let texts = store.recent_texts("tqqq", 10).await.unwrap();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].timestamp > texts[1].timestamp);

        assert_eq!(store.recent_texts("TQQQ", 1).await.unwrap().len(), 1);
        assert!(store.recent_texts("NVDA", 10).await.unwrap().is_empty());
        assert!(store.last_refreshed().await.is_some());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvTextStore::new(dir.path().join("absent.csv")).unwrap();

        assert!(store.last_refreshed().await.is_none());
        assert!(matches!(
            store.recent_texts("TQQQ", 5).await,
            Err(DataError::NoDataAvailable)
        ));
    }
}
