//! Core data types for the signal pipeline.

mod filter;
mod fundamentals;
mod ohlcv;
mod signal;
mod text;

pub use filter::{FilterDecision, FilterKind};
pub use fundamentals::Fundamentals;
pub use ohlcv::{Bar, BarSeries};
pub use signal::{Action, CombinedSignal, RiskPlan, SignalMeta, SignalRow, StrategyKind};
pub use text::{TextOrigin, TextRecord};
