//! Universe/earnings/sector gate outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single gate that can reject a symbol, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    NoData,
    MinPrice,
    MinDollarVol,
    MinAvgVolume,
    SectorExclude,
    BiotechNoCatalyst,
    EarningsWindow,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::NoData => "no_data",
            FilterKind::MinPrice => "min_price",
            FilterKind::MinDollarVol => "min_dollar_vol",
            FilterKind::MinAvgVolume => "min_avg_volume",
            FilterKind::SectorExclude => "sector_exclude",
            FilterKind::BiotechNoCatalyst => "biotech_no_catalyst",
            FilterKind::EarningsWindow => "earnings_window",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass/fail plus every filter that fired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDecision {
    pub triggered: Vec<FilterKind>,
}

impl FilterDecision {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, filter: FilterKind) {
        self.triggered.push(filter);
    }

    /// True when no filter fired.
    pub fn passed(&self) -> bool {
        self.triggered.is_empty()
    }

    pub fn contains(&self, filter: FilterKind) -> bool {
        self.triggered.contains(&filter)
    }
}
