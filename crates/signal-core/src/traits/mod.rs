//! Seams between the pipeline and its collaborators.

mod data_source;
mod indicator;
mod strategy;

pub use data_source::{FundamentalsSource, MarketData, TextSource};
pub use indicator::{Indicator, MultiOutputIndicator};
pub use strategy::{BaseScorer, ScoringInput, StrategyConfig};
