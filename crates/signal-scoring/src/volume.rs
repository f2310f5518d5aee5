//! Abnormal volume detection.
//!
//! Two views of the same series: a bounded z-score strength of the latest
//! bar against its trailing window, and a list of spike days where volume
//! exceeds a multiple of the trailing median.

use serde::{Deserialize, Serialize};
use signal_core::{Degraded, Scored};
use signal_indicators::Rolling;

/// Z-score based volume strength.
#[derive(Debug, Clone, Copy)]
pub struct VolumeAnomaly {
    rolling: Rolling,
    clip: f64,
}

impl Default for VolumeAnomaly {
    fn default() -> Self {
        Self::new(20, 5)
    }
}

impl VolumeAnomaly {
    pub fn new(window: usize, min_periods: usize) -> Self {
        Self {
            rolling: Rolling::new(window, min_periods),
            clip: 3.0,
        }
    }

    /// Z-score of the latest volume, clipped to ±3.
    ///
    /// `None` for short series, non-finite values or a flat window.
    pub fn zscore(&self, volumes: &[f64]) -> Option<f64> {
        if volumes.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let latest = *volumes.last()?;
        let mean = self.rolling.mean_last(volumes)?;
        let std = self.rolling.std_last(volumes)?;
        if std <= f64::EPSILON {
            return None;
        }
        Some(((latest - mean) / std).clamp(-self.clip, self.clip))
    }

    /// Strength in [-1, 1]: the clipped z-score divided by three.
    pub fn strength(&self, volumes: &[f64]) -> Scored<f64> {
        if volumes.iter().any(|v| !v.is_finite()) {
            return Scored::neutral(Degraded::MissingInput {
                field: "volume".into(),
            });
        }
        if volumes.len() < self.rolling.min_periods {
            return Scored::neutral(Degraded::InsufficientData {
                required: self.rolling.min_periods,
                available: volumes.len(),
            });
        }
        match self.zscore(volumes) {
            Some(z) => Scored::ok(z / self.clip),
            // Flat window: nothing abnormal about the latest bar
            None => Scored::ok(0.0),
        }
    }
}

/// One day whose volume broke above the trailing median.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpike {
    /// Position in the input series
    pub index: usize,
    pub volume: f64,
    pub rolling_median: f64,
    pub ratio: f64,
    /// 3 for ratio ≥ 3.0, 2 for ≥ 2.5, else 1
    pub tier: u8,
}

/// Median-multiple spike detector.
#[derive(Debug, Clone, Copy)]
pub struct SpikeDetector {
    rolling: Rolling,
    threshold: f64,
}

impl Default for SpikeDetector {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}

impl SpikeDetector {
    pub fn new(window: usize, threshold: f64) -> Self {
        Self {
            rolling: Rolling::new(window, 1),
            threshold,
        }
    }

    /// Every spike in the series, in order.
    pub fn detect(&self, volumes: &[f64]) -> Vec<VolumeSpike> {
        self.rolling
            .medians(volumes)
            .into_iter()
            .enumerate()
            .filter_map(|(index, median)| {
                let median = median?;
                let volume = volumes[index];
                if !volume.is_finite() || median <= 0.0 || volume <= self.threshold * median {
                    return None;
                }
                let ratio = volume / median;
                Some(VolumeSpike {
                    index,
                    volume,
                    rolling_median: median,
                    ratio,
                    tier: tier_for(ratio),
                })
            })
            .collect()
    }

    /// The spike on the latest bar, if there is one.
    pub fn latest(&self, volumes: &[f64]) -> Option<VolumeSpike> {
        let last = volumes.len().checked_sub(1)?;
        self.detect(volumes).into_iter().find(|s| s.index == last)
    }
}

fn tier_for(ratio: f64) -> u8 {
    if ratio >= 3.0 {
        3
    } else if ratio >= 2.5 {
        2
    } else {
        1
    }
}
