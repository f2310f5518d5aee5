//! Gates and trade planning for scored symbols.
//!
//! Provides the universe/sector/earnings filter gate, fixed-percentage trade
//! plans and ATR-scaled position sizing.

mod filters;
mod position_sizer;
mod risk_manager;
mod trade_plan;

pub use filters::{FilterGate, FilterInput, FilterSettings};
pub use position_sizer::PositionSizer;
pub use risk_manager::{RiskManager, RiskSettings, TradeSetup};
pub use trade_plan::TradePlanner;
