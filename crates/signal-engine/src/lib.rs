//! Signal combiner.
//!
//! Fans a request out over its symbols, scores each with the strategy's base
//! scorer plus the shared enhancers, gates it, and attaches a risk plan.

mod combiner;
mod config;
mod engine;
mod market;
mod report;

pub use combiner::{confidence, Blend, CombinerWeights, ComponentScores, SignalCombiner};
pub use config::{EngineConfig, EngineSettings, MarketSettings};
pub use engine::{Collaborators, SignalEngine};
pub use market::{MarketContext, MarketScorers, PriceBook};
pub use report::SignalBatch;
