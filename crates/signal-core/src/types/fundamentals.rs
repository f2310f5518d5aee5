//! Company metadata used by the sector and earnings gates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sector classification and the most recent earnings report date.
///
/// Both fields are optional: a missing lookup is the empty value, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub sector: Option<String>,
    pub last_earnings_date: Option<NaiveDate>,
}

impl Fundamentals {
    pub fn is_empty(&self) -> bool {
        self.sector.is_none() && self.last_earnings_date.is_none()
    }
}
