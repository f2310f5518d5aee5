//! Weighted blend of the per-symbol component scores.

use serde::{Deserialize, Serialize};
use signal_core::types::{Action, StrategyKind};

/// Component weights for the enhanced score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinerWeights {
    pub base: f64,
    pub technical: f64,
    pub volume: f64,
    pub sentiment: f64,
    pub macro_regime: f64,
    pub etf_premium: f64,
}

impl CombinerWeights {
    /// Fixed weights per strategy.
    ///
    /// Leveraged ETFs also weigh the market regime and the fund's tracking
    /// difference; small caps only use their own inputs.
    pub fn for_strategy(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::LeveragedEtf => Self {
                base: 0.30,
                technical: 0.25,
                volume: 0.20,
                sentiment: 0.10,
                macro_regime: 0.10,
                etf_premium: 0.05,
            },
            StrategyKind::MomentumSmallcap => Self {
                base: 0.35,
                technical: 0.30,
                volume: 0.20,
                sentiment: 0.15,
                macro_regime: 0.0,
                etf_premium: 0.0,
            },
        }
    }

    pub fn total(&self) -> f64 {
        self.base + self.technical + self.volume + self.sentiment + self.macro_regime + self.etf_premium
    }
}

/// Inputs to the blend, one per weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub base: f64,
    pub technical: f64,
    pub volume: f64,
    pub sentiment: f64,
    pub macro_regime: f64,
    /// Tracking-difference signal in -2..=2
    pub etf_premium: f64,
}

/// Result of blending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blend {
    pub enhanced_strength: f64,
    pub action: Action,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SignalCombiner {
    weights: CombinerWeights,
    strong: f64,
    weak: f64,
}

impl SignalCombiner {
    pub fn new(weights: CombinerWeights, strong: f64, weak: f64) -> Self {
        Self { weights, strong, weak }
    }

    pub fn for_strategy(kind: StrategyKind, strong: f64, weak: f64) -> Self {
        Self::new(CombinerWeights::for_strategy(kind), strong, weak)
    }

    /// Enhanced strength clamped to [-1, 1].
    ///
    /// A non-finite component counts as 0.
    pub fn enhanced_strength(&self, scores: &ComponentScores) -> f64 {
        let w = &self.weights;
        let parts = [
            (w.base, scores.base),
            (w.technical, scores.technical),
            (w.volume, scores.volume),
            (w.sentiment, scores.sentiment),
            (w.macro_regime, scores.macro_regime),
            (w.etf_premium, scores.etf_premium),
        ];
        let total: f64 = parts
            .iter()
            .map(|(weight, score)| if score.is_finite() { weight * score } else { 0.0 })
            .sum();
        total.clamp(-1.0, 1.0)
    }

    pub fn blend(&self, scores: &ComponentScores) -> Blend {
        let enhanced_strength = self.enhanced_strength(scores);
        Blend {
            enhanced_strength,
            action: Action::from_strength(enhanced_strength, self.strong, self.weak),
            confidence: confidence(enhanced_strength),
        }
    }
}

/// Confidence grows with the magnitude of the enhanced score.
pub fn confidence(enhanced_strength: f64) -> f64 {
    if enhanced_strength.is_finite() {
        enhanced_strength.abs().min(1.0)
    } else {
        0.0
    }
}
