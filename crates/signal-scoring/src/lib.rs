//! Leaf scorers for the signal pipeline.
//!
//! Every scorer is a pure function of its inputs:
//! - [`SentimentAnalyzer`]: text polarity in [-1, 1]
//! - [`CatalystScorer`]: share of texts announcing a positive event
//! - [`VolumeAnomaly`] / [`SpikeDetector`]: abnormal volume
//! - [`TechnicalScorer`]: RSI and trend crossover strength
//! - [`MacroFilter`]: volatility regime and index momentum
//! - [`SectorRotationScorer`]: sector relative strength
//! - [`PremiumMonitor`]: leveraged ETF tracking difference
//!
//! Scorers that can lack data return [`signal_core::Scored`] so callers can
//! see why a neutral value was produced.

pub mod catalyst;
mod lexicon;
pub mod macro_filter;
pub mod sector;
pub mod sentiment;
pub mod technical;
pub mod volume;
pub mod etf_premium;

pub use catalyst::CatalystScorer;
pub use etf_premium::{
    default_pairs, EtfPair, PremiumMonitor, PremiumReading, PremiumStatus, PremiumSummary,
};
pub use macro_filter::{MacroFilter, MacroSignal};
pub use sector::{default_sectors, SectorProxy, SectorRotation, SectorRotationScorer, SectorScore};
pub use sentiment::SentimentAnalyzer;
pub use technical::{TechnicalReading, TechnicalScorer};
pub use volume::{SpikeDetector, VolumeAnomaly, VolumeSpike};
