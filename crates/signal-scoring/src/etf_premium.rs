//! Leveraged ETF tracking-difference monitor.
//!
//! A 3× fund should return three times its underlying each day. When it
//! returns less it trades at a discount (a buy signal); when it returns more
//! it is rich (a sell signal). Differences are in percentage points.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use signal_core::types::{Action, Bar};

/// A leveraged fund and the index it multiplies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtfPair {
    pub leveraged: String,
    pub underlying: String,
    #[serde(default = "default_leverage")]
    pub leverage: f64,
}

fn default_leverage() -> f64 {
    3.0
}

impl EtfPair {
    pub fn new(leveraged: &str, underlying: &str, leverage: f64) -> Self {
        Self {
            leveraged: leveraged.to_string(),
            underlying: underlying.to_string(),
            leverage,
        }
    }
}

/// TQQQ/QQQ, SOXL/SOXX and LABU/XBI at 3×.
pub fn default_pairs() -> Vec<EtfPair> {
    vec![
        EtfPair::new("TQQQ", "QQQ", 3.0),
        EtfPair::new("SOXL", "SOXX", 3.0),
        EtfPair::new("LABU", "XBI", 3.0),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumStatus {
    Ok,
    NoData,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumReading {
    pub symbol: String,
    pub underlying: String,
    pub status: PremiumStatus,
    /// Latest tracking difference in percentage points
    pub tracking_pct: f64,
    /// Mean tracking difference over the last few sessions
    pub avg_tracking_pct: f64,
    /// +2 deep discount .. -2 rich premium
    pub signal: i8,
    pub actual_return: f64,
    pub theoretical_return: f64,
}

impl PremiumReading {
    fn unavailable(pair: &EtfPair, status: PremiumStatus) -> Self {
        Self {
            symbol: pair.leveraged.clone(),
            underlying: pair.underlying.clone(),
            status,
            tracking_pct: 0.0,
            avg_tracking_pct: 0.0,
            signal: 0,
            actual_return: 0.0,
            theoretical_return: 0.0,
        }
    }
}

/// Aggregate across every tracked fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumSummary {
    pub readings: Vec<PremiumReading>,
    pub average_signal: f64,
    pub average_tracking_pct: f64,
    pub recommendation: Action,
    /// The usable fund trading at the deepest discount
    pub best_value: Option<String>,
}

impl Default for PremiumSummary {
    fn default() -> Self {
        Self {
            readings: Vec::new(),
            average_signal: 0.0,
            average_tracking_pct: 0.0,
            recommendation: Action::Hold,
            best_value: None,
        }
    }
}

impl PremiumSummary {
    /// Signal for one fund; 0.0 when it is untracked or unusable.
    pub fn score_for(&self, symbol: &str) -> f64 {
        self.readings
            .iter()
            .find(|r| r.status == PremiumStatus::Ok && r.symbol.eq_ignore_ascii_case(symbol))
            .map_or(0.0, |r| f64::from(r.signal))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PremiumMonitor {
    strong_band: f64,
    band: f64,
    avg_window: usize,
}

impl Default for PremiumMonitor {
    fn default() -> Self {
        Self {
            strong_band: 0.5,
            band: 0.2,
            avg_window: 3,
        }
    }
}

impl PremiumMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a tracking difference to a signal; [-0.2, 0.2] is neutral.
    pub fn signal_for(&self, tracking_pct: f64) -> i8 {
        if !tracking_pct.is_finite() {
            0
        } else if tracking_pct <= -self.strong_band {
            2
        } else if tracking_pct < -self.band {
            1
        } else if tracking_pct > self.strong_band {
            -2
        } else if tracking_pct > self.band {
            -1
        } else {
            0
        }
    }

    /// Reading for one pair from daily bars of both legs, joined by date.
    pub fn reading(&self, pair: &EtfPair, leveraged: &[Bar], underlying: &[Bar]) -> PremiumReading {
        if leveraged.is_empty() || underlying.is_empty() {
            return PremiumReading::unavailable(pair, PremiumStatus::NoData);
        }

        let underlying_by_date: BTreeMap<NaiveDate, f64> =
            underlying.iter().map(|b| (b.date(), b.close)).collect();
        let mut joined: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
        for bar in leveraged {
            if let Some(&u) = underlying_by_date.get(&bar.date()) {
                joined.insert(bar.date(), (bar.close, u));
            }
        }
        let closes: Vec<(f64, f64)> = joined.into_values().collect();
        if closes.iter().any(|(l, u)| !(*l > 0.0 && *u > 0.0)) {
            return PremiumReading::unavailable(pair, PremiumStatus::NoData);
        }

        let tracking: Vec<(f64, f64, f64)> = closes
            .windows(2)
            .map(|w| {
                let actual = w[1].0 / w[0].0 - 1.0;
                let theoretical = pair.leverage * (w[1].1 / w[0].1 - 1.0);
                ((actual - theoretical) * 100.0, actual, theoretical)
            })
            .collect();
        if tracking.len() < 2 {
            return PremiumReading::unavailable(pair, PremiumStatus::InsufficientData);
        }

        let recent = &tracking[tracking.len().saturating_sub(self.avg_window)..];
        let avg_tracking_pct = recent.iter().map(|t| t.0).sum::<f64>() / recent.len() as f64;
        let (tracking_pct, actual_return, theoretical_return) = tracking[tracking.len() - 1];

        PremiumReading {
            symbol: pair.leveraged.clone(),
            underlying: pair.underlying.clone(),
            status: PremiumStatus::Ok,
            tracking_pct,
            avg_tracking_pct,
            signal: self.signal_for(tracking_pct),
            actual_return,
            theoretical_return,
        }
    }

    /// Average usable readings into a recommendation.
    ///
    /// No usable readings yields a neutral HOLD.
    pub fn summarize(&self, readings: Vec<PremiumReading>) -> PremiumSummary {
        let usable: Vec<&PremiumReading> = readings
            .iter()
            .filter(|r| r.status == PremiumStatus::Ok)
            .collect();
        if usable.is_empty() {
            return PremiumSummary {
                readings,
                ..PremiumSummary::default()
            };
        }

        let n = usable.len() as f64;
        let average_signal = usable.iter().map(|r| f64::from(r.signal)).sum::<f64>() / n;
        let average_tracking_pct = usable.iter().map(|r| r.tracking_pct).sum::<f64>() / n;
        let best_value = usable
            .iter()
            .min_by(|a, b| a.tracking_pct.total_cmp(&b.tracking_pct))
            .map(|r| r.symbol.clone());

        PremiumSummary {
            recommendation: Action::from_strength(average_signal, 1.5, 0.5),
            average_signal,
            average_tracking_pct,
            best_value,
            readings,
        }
    }
}
