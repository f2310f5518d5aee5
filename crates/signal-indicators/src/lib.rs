//! Technical indicators for the signal scorers.
//!
//! This crate provides the indicators the scoring pipeline relies on:
//! - Moving averages (SMA with partial warm-up windows, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (ATR, standard deviation)
//! - Trailing-window statistics (mean, sample std, max, median, percent change)

pub mod momentum;
pub mod moving_average;
pub mod rolling;
pub mod volatility;

pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma};
pub use rolling::{median, pct_change_last, trailing_return, Rolling};
pub use volatility::{std_dev, Atr, StdDev};
