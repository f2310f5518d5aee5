//! Batch output and its text summary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signal_core::error::SignalError;
use signal_core::types::{Action, CombinedSignal, SignalRow, StrategyKind};
use signal_core::Degraded;
use signal_scoring::{MacroSignal, PremiumSummary, SectorRotation};
use uuid::Uuid;

use crate::market::MarketContext;

/// One `compute_signals` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalBatch {
    pub run_id: Uuid,
    pub strategy: StrategyKind,
    pub generated_at: DateTime<Utc>,
    /// One row per requested symbol, in request order
    pub signals: Vec<CombinedSignal>,
    #[serde(rename = "macro")]
    pub macro_signal: MacroSignal,
    pub sector_rotation: SectorRotation,
    pub etf_premium: PremiumSummary,
    /// Batch-level fallbacks (stale texts, missing market data)
    pub degraded: Vec<Degraded>,
}

impl SignalBatch {
    pub fn new(
        strategy: StrategyKind,
        generated_at: DateTime<Utc>,
        signals: Vec<CombinedSignal>,
        context: MarketContext,
        mut degraded: Vec<Degraded>,
    ) -> Self {
        degraded.extend(context.degraded);
        Self {
            run_id: Uuid::new_v4(),
            strategy,
            generated_at,
            signals,
            macro_signal: context.macro_signal,
            sector_rotation: context.sector_rotation,
            etf_premium: context.etf_premium,
            degraded,
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&CombinedSignal> {
        self.signals
            .iter()
            .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Signal count per action.
    pub fn action_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for signal in &self.signals {
            *counts.entry(signal.action.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Flatten every signal for tabular snapshots.
    pub fn rows(&self) -> Result<Vec<SignalRow>, SignalError> {
        self.signals.iter().map(CombinedSignal::to_row).collect()
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                      SIGNAL REPORT                         \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Strategy:            {}\n", self.strategy));
        s.push_str(&format!(
            "  Generated:           {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        s.push_str(&format!("  Run:                 {}\n\n", self.run_id));

        s.push_str("MARKET\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Macro Score:         {:+.2} (vix {:+}, momentum {:+})\n",
            self.macro_signal.combined_score,
            self.macro_signal.vix_signal,
            self.macro_signal.momentum_signal
        ));
        s.push_str(&format!(
            "  Strongest Sector:    {}\n",
            self.sector_rotation.strongest.as_deref().unwrap_or("-")
        ));
        s.push_str(&format!(
            "  ETF Premium:         {:+.2} ({})\n",
            self.etf_premium.average_signal, self.etf_premium.recommendation
        ));
        s.push('\n');

        s.push_str("SIGNALS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str("  Symbol   Action        Enhanced  Conf   Entry     Size\n");
        for signal in &self.signals {
            s.push_str(&format!(
                "  {:<8} {:<12} {:>+9.3} {:>5.2} {:>9.2} {:>9}\n",
                signal.symbol,
                signal.action.as_str(),
                signal.enhanced_strength,
                signal.confidence,
                signal.entry_price,
                signal.position_size.to_string()
            ));
            if !signal.meta.filters.is_empty() {
                let names: Vec<&str> = signal.meta.filters.iter().map(|f| f.as_str()).collect();
                s.push_str(&format!("           filtered: {}\n", names.join(", ")));
            }
            if let Some(error) = &signal.meta.error {
                s.push_str(&format!("           error: {error}\n"));
            }
        }
        s.push('\n');

        let buys = self.signals.iter().filter(|x| x.action.is_buy()).count();
        let sells = self.signals.iter().filter(|x| x.action.is_sell()).count();
        let holds = self.signals.iter().filter(|x| x.action == Action::Hold).count();
        s.push_str(&format!(
            "  Buy: {buys}   Sell: {sells}   Hold: {holds}   Degraded inputs: {}\n",
            self.degraded.len() + self.signals.iter().map(|x| x.meta.degraded.len()).sum::<usize>()
        ));
        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
