//! Market-wide context shared by every symbol in a batch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use signal_core::types::Bar;
use signal_core::Degraded;
use signal_scoring::{
    MacroFilter, MacroSignal, PremiumMonitor, PremiumSummary, SectorProxy, SectorRotation,
    SectorRotationScorer,
};

use crate::config::MarketSettings;

/// Daily bars keyed by upper-case symbol.
pub type PriceBook = HashMap<String, Vec<Bar>>;

/// Regime, sector leadership and ETF tracking for one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    pub macro_signal: MacroSignal,
    pub sector_rotation: SectorRotation,
    pub etf_premium: PremiumSummary,
    /// Why any part of the context fell back to neutral
    pub degraded: Vec<Degraded>,
}

/// The scorers behind [`MarketContext`].
#[derive(Debug, Clone)]
pub struct MarketScorers {
    pub macro_filter: MacroFilter,
    pub rotation: SectorRotationScorer,
    pub premium: PremiumMonitor,
}

impl MarketScorers {
    pub fn new(settings: &MarketSettings) -> Self {
        Self {
            macro_filter: MacroFilter::new(),
            rotation: SectorRotationScorer::new(settings.sector_lookback),
            premium: PremiumMonitor::new(),
        }
    }

    /// Every symbol the context reads, deduplicated, in first-use order.
    pub fn symbols(settings: &MarketSettings) -> Vec<String> {
        let mut symbols: Vec<String> = Vec::new();
        let mut add = |s: &str| {
            let s = s.trim().to_ascii_uppercase();
            if !s.is_empty() && !symbols.contains(&s) {
                symbols.push(s);
            }
        };
        add(&settings.vix_symbol);
        add(&settings.momentum_symbol);
        add(&settings.sector_benchmark);
        for sector in &settings.sectors {
            add(&sector.proxy);
        }
        for pair in &settings.etf_pairs {
            add(&pair.leveraged);
            add(&pair.underlying);
        }
        symbols
    }

    /// Evaluate the context from already-fetched prices.
    ///
    /// Missing symbols are treated as empty histories.
    pub fn evaluate(&self, settings: &MarketSettings, prices: &PriceBook) -> MarketContext {
        let mut degraded = Vec::new();

        let (macro_signal, reason) = self
            .macro_filter
            .evaluate(
                &closes(prices, &settings.vix_symbol),
                &closes(prices, &settings.momentum_symbol),
            )
            .into_parts();
        degraded.extend(reason);

        let benchmark = closes(prices, &settings.sector_benchmark);
        let sector_closes: Vec<(&SectorProxy, Vec<f64>)> = settings
            .sectors
            .iter()
            .map(|s| (s, closes(prices, &s.proxy)))
            .collect();
        let sector_refs: Vec<(&SectorProxy, &[f64])> = sector_closes
            .iter()
            .map(|(s, c)| (*s, c.as_slice()))
            .collect();
        let (sector_rotation, reason) = self.rotation.evaluate(&benchmark, &sector_refs).into_parts();
        degraded.extend(reason);

        let readings = settings
            .etf_pairs
            .iter()
            .map(|pair| {
                self.premium.reading(
                    pair,
                    bars(prices, &pair.leveraged),
                    bars(prices, &pair.underlying),
                )
            })
            .collect();
        let etf_premium = self.premium.summarize(readings);

        MarketContext {
            macro_signal,
            sector_rotation,
            etf_premium,
            degraded,
        }
    }
}

fn bars<'a>(prices: &'a PriceBook, symbol: &str) -> &'a [Bar] {
    prices
        .get(&symbol.trim().to_ascii_uppercase())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn closes(prices: &PriceBook, symbol: &str) -> Vec<f64> {
    bars(prices, symbol).iter().map(|b| b.close).collect()
}
