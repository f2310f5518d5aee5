//! Core types and traits for the signal aggregator.
//!
//! This crate provides the foundational building blocks including:
//! - Market and text data types (Bar, BarSeries, TextRecord)
//! - Combined signals, trade plans and filter decisions
//! - Typed soft-failure results
//! - Traits for indicators, base scorers, and data collaborators

pub mod error;
pub mod outcome;
pub mod traits;
pub mod types;

pub use error::{DataError, SignalError, StrategyError};
pub use outcome::{Degraded, Scored};
pub use traits::*;
pub use types::*;
