//! Per-strategy base scorers.
//!
//! This crate provides the two base strategies the combiner can run:
//! - Leveraged ETF momentum (moving-average cross + short-term momentum)
//! - Small-cap momentum (return, breakout, volume, sentiment, catalyst)

mod leveraged_etf;
mod momentum_smallcap;
mod registry;

pub use leveraged_etf::{LeveragedEtfConfig, LeveragedEtfScorer};
pub use momentum_smallcap::{MomentumSmallcapConfig, MomentumSmallcapScorer};
pub use registry::{StrategyInfo, StrategyRegistry};
