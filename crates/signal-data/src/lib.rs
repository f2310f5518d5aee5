//! Data collaborators for the signal engine.
//!
//! File-backed price, text and fundamentals sources, a TTL cache for slow
//! lookups, in-memory sources for tests and demos, and snapshot persistence.

mod cache;
mod csv_source;
mod memory;
mod snapshot;
mod symbols;
mod texts;

pub use cache::{CachedFundamentals, DataCache};
pub use csv_source::{parse_bars, parse_timestamp, CsvFundamentals, CsvMarketData};
pub use memory::{StaticFundamentals, StaticMarketData, StaticTexts};
pub use snapshot::{SnapshotPaths, SnapshotWriter};
pub use symbols::SymbolExtractor;
pub use texts::{parse_texts, CsvTextStore};
