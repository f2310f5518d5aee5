//! Universe, sector and earnings gates applied before enhancement.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use signal_core::types::{BarSeries, FilterDecision, FilterKind, Fundamentals};
use tracing::info;

/// Lookback used by both liquidity gates.
const LIQUIDITY_WINDOW: usize = 10;

/// Gate thresholds. Every field has a default so partial config files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Minimum last close
    pub min_price: f64,
    /// Minimum 10-bar mean of close × volume
    pub min_10d_dollar_volume: f64,
    /// Minimum 10-bar mean of raw volume, unchecked when unset
    pub min_avg_volume: Option<f64>,
    /// Days after an earnings report during which the symbol is blacked out
    pub earnings_window_days: i64,
    /// Sectors never traded (case-insensitive)
    pub sector_exclude: Vec<String>,
    /// Substrings marking a sector as biotech-like (case-insensitive)
    pub sectors_biotech: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            min_price: 1.0,
            min_10d_dollar_volume: 1_000_000.0,
            min_avg_volume: None,
            earnings_window_days: 3,
            sector_exclude: Vec::new(),
            sectors_biotech: vec![
                "biotech".to_string(),
                "life sciences".to_string(),
                "pharmaceutical".to_string(),
            ],
        }
    }
}

/// Everything the gate looks at for one symbol.
#[derive(Debug, Clone, Copy)]
pub struct FilterInput<'a> {
    pub series: &'a BarSeries,
    pub fundamentals: &'a Fundamentals,
    /// Whether any recent text carries a catalyst
    pub has_catalyst: bool,
    pub today: NaiveDate,
}

/// Evaluates [`FilterSettings`] against one symbol at a time.
#[derive(Debug, Clone)]
pub struct FilterGate {
    settings: FilterSettings,
    exclude: Vec<String>,
    biotech: Vec<String>,
}

impl FilterGate {
    pub fn new(settings: FilterSettings) -> Self {
        let exclude = settings
            .sector_exclude
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();
        let biotech = settings
            .sectors_biotech
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            settings,
            exclude,
            biotech,
        }
    }

    /// Run every gate and record each one that fires, in reporting order.
    ///
    /// An empty series fires `no_data` alone; nothing else is evaluated.
    pub fn evaluate(&self, input: &FilterInput<'_>) -> FilterDecision {
        let mut decision = FilterDecision::pass();
        let series = input.series;

        let Some(last_close) = series.last_close() else {
            decision.reject(FilterKind::NoData);
            info!(symbol = %series.symbol, filters = ?decision.triggered, "symbol rejected");
            return decision;
        };

        // NaN comparisons are false, so an unusable close is rejected too
        if !(last_close >= self.settings.min_price) {
            decision.reject(FilterKind::MinPrice);
        }

        let dollar_volume = series.avg_dollar_volume(LIQUIDITY_WINDOW).unwrap_or(0.0);
        if !(dollar_volume >= self.settings.min_10d_dollar_volume) {
            decision.reject(FilterKind::MinDollarVol);
        }

        if let Some(min_volume) = self.settings.min_avg_volume {
            let volume = series.avg_volume(LIQUIDITY_WINDOW).unwrap_or(0.0);
            if !(volume >= min_volume) {
                decision.reject(FilterKind::MinAvgVolume);
            }
        }

        if let Some(sector) = input.fundamentals.sector.as_deref() {
            let sector = sector.trim().to_lowercase();
            if self.exclude.iter().any(|s| *s == sector) {
                decision.reject(FilterKind::SectorExclude);
            }
            if !input.has_catalyst && self.biotech.iter().any(|b| sector.contains(b.as_str())) {
                decision.reject(FilterKind::BiotechNoCatalyst);
            }
        }

        if let Some(reported) = input.fundamentals.last_earnings_date {
            if self.in_earnings_window(reported, input.today) {
                decision.reject(FilterKind::EarningsWindow);
            }
        }

        if !decision.passed() {
            info!(symbol = %series.symbol, filters = ?decision.triggered, "symbol rejected");
        }
        decision
    }

    /// A report dated today counts; a future date does not.
    fn in_earnings_window(&self, reported: NaiveDate, today: NaiveDate) -> bool {
        let days_since = (today - reported).num_days();
        (0..=self.settings.earnings_window_days).contains(&days_since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::Bar;

    const DAY_MS: i64 = 86_400_000;

    fn series(close: f64, volume: f64, n: usize) -> BarSeries {
        let bars = (0..n)
            .map(|i| Bar::new(i as i64 * DAY_MS, close, close, close, close, volume))
            .collect();
        BarSeries::new("TEST", bars)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn evaluate(gate: &FilterGate, series: &BarSeries, fundamentals: &Fundamentals) -> FilterDecision {
        gate.evaluate(&FilterInput {
            series,
            fundamentals,
            has_catalyst: false,
            today: today(),
        })
    }

    #[test]
    fn test_liquid_symbol_passes() {
        let gate = FilterGate::new(FilterSettings::default());
        let decision = evaluate(&gate, &series(50.0, 100_000.0, 20), &Fundamentals::default());

        assert!(decision.passed());
    }

    #[test]
    fn test_no_data_short_circuits() {
        let gate = FilterGate::new(FilterSettings::default());
        let fundamentals = Fundamentals {
            sector: Some("Biotechnology".into()),
            last_earnings_date: Some(today()),
        };

        let decision = evaluate(&gate, &BarSeries::empty("GONE"), &fundamentals);
        assert_eq!(decision.triggered, vec![FilterKind::NoData]);
    }

    #[test]
    fn test_penny_stock_is_rejected() {
        let gate = FilterGate::new(FilterSettings::default());
        let decision = evaluate(&gate, &series(0.5, 10_000_000.0, 20), &Fundamentals::default());

        assert_eq!(decision.triggered, vec![FilterKind::MinPrice]);
    }

    #[test]
    fn test_filters_accumulate_in_order() {
        let gate = FilterGate::new(FilterSettings {
            min_avg_volume: Some(50_000.0),
            sector_exclude: vec!["Energy".into()],
            ..FilterSettings::default()
        });
        let fundamentals = Fundamentals {
            sector: Some("energy".into()),
            last_earnings_date: Some(today() - chrono::Duration::days(2)),
        };

        let decision = evaluate(&gate, &series(0.8, 1_000.0, 20), &fundamentals);
        assert_eq!(
            decision.triggered,
            vec![
                FilterKind::MinPrice,
                FilterKind::MinDollarVol,
                FilterKind::MinAvgVolume,
                FilterKind::SectorExclude,
                FilterKind::EarningsWindow,
            ]
        );
    }

    #[test]
    fn test_biotech_needs_catalyst() {
        let gate = FilterGate::new(FilterSettings::default());
        let liquid = series(20.0, 200_000.0, 20);
        let fundamentals = Fundamentals {
            sector: Some("Healthcare - Biotechnology".into()),
            last_earnings_date: None,
        };

        let without = evaluate(&gate, &liquid, &fundamentals);
        assert_eq!(without.triggered, vec![FilterKind::BiotechNoCatalyst]);

        let with = gate.evaluate(&FilterInput {
            series: &liquid,
            fundamentals: &fundamentals,
            has_catalyst: true,
            today: today(),
        });
        assert!(with.passed());
    }

    #[test]
    fn test_earnings_window_bounds() {
        let gate = FilterGate::new(FilterSettings::default());
        let liquid = series(20.0, 200_000.0, 20);
        let reported = |days: i64| Fundamentals {
            sector: None,
            last_earnings_date: Some(today() - chrono::Duration::days(days)),
        };

        assert!(evaluate(&gate, &liquid, &reported(0)).contains(FilterKind::EarningsWindow));
        assert!(evaluate(&gate, &liquid, &reported(3)).contains(FilterKind::EarningsWindow));
        assert!(evaluate(&gate, &liquid, &reported(4)).passed());
        assert!(evaluate(&gate, &liquid, &reported(-1)).passed());
    }

    #[test]
    fn test_dollar_volume_uses_last_ten_bars() {
        let gate = FilterGate::new(FilterSettings::default());
        // Liquid history but the last ten sessions dried up
        let mut bars: Vec<Bar> = (0..20)
            .map(|i| Bar::new(i * DAY_MS, 10.0, 10.0, 10.0, 10.0, 1_000_000.0))
            .collect();
        for bar in bars.iter_mut().skip(10) {
            bar.volume = 10.0;
        }

        let decision = evaluate(&gate, &BarSeries::new("DRY", bars), &Fundamentals::default());
        assert_eq!(decision.triggered, vec![FilterKind::MinDollarVol]);
    }
}
