//! Sector relative strength against a broad benchmark.

use serde::{Deserialize, Serialize};
use signal_core::{Degraded, Scored};
use signal_indicators::trailing_return;

/// A tracked sector: its ETF proxy and, optionally, the leveraged ETF to
/// trade when the sector leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorProxy {
    pub name: String,
    pub proxy: String,
    #[serde(default)]
    pub leveraged: Option<String>,
}

impl SectorProxy {
    pub fn new(name: &str, proxy: &str, leveraged: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            proxy: proxy.to_string(),
            leveraged: leveraged.map(str::to_string),
        }
    }
}

/// Default sector set: tech, semiconductors and biotech.
pub fn default_sectors() -> Vec<SectorProxy> {
    vec![
        SectorProxy::new("tech", "QQQ", Some("TQQQ")),
        SectorProxy::new("semi", "SOXX", Some("SOXL")),
        SectorProxy::new("bio", "XBI", Some("LABU")),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorScore {
    pub name: String,
    pub proxy: String,
    pub leveraged: Option<String>,
    /// Sector return minus benchmark return over the lookback
    pub relative_strength: f64,
    /// +1 leading, 0 in line, -1 lagging
    pub score: i8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorRotation {
    /// One entry per tracked sector, in configured order
    pub sectors: Vec<SectorScore>,
    pub strongest: Option<String>,
    pub benchmark_return: f64,
    /// Leveraged ETF mapped to the strongest sector
    pub recommended_etf: Option<String>,
}

impl SectorRotation {
    pub fn score_of(&self, sector: &str) -> Option<i8> {
        self.sectors.iter().find(|s| s.name == sector).map(|s| s.score)
    }

    /// Score of the sector a leveraged ETF tracks, if any.
    pub fn score_for_etf(&self, symbol: &str) -> Option<i8> {
        self.sectors
            .iter()
            .find(|s| s.leveraged.as_deref().is_some_and(|l| l.eq_ignore_ascii_case(symbol)))
            .map(|s| s.score)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SectorRotationScorer {
    lookback: usize,
    band: f64,
}

impl Default for SectorRotationScorer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl SectorRotationScorer {
    pub fn new(lookback: usize) -> Self {
        Self {
            lookback,
            band: 0.02,
        }
    }

    /// Compare every sector's return to the benchmark's.
    ///
    /// A missing benchmark makes every sector neutral. The strongest sector
    /// is the first with the highest score, defaulting to the first sector.
    pub fn evaluate(
        &self,
        benchmark_closes: &[f64],
        sectors: &[(&SectorProxy, &[f64])],
    ) -> Scored<SectorRotation> {
        let benchmark = trailing_return(benchmark_closes, self.lookback);
        let mut degraded = benchmark.is_none().then(|| Degraded::InsufficientData {
            required: self.lookback,
            available: benchmark_closes.len(),
        });

        let scores: Vec<SectorScore> = sectors
            .iter()
            .map(|(sector, closes)| {
                let own = trailing_return(closes, self.lookback);
                if own.is_none() && degraded.is_none() {
                    degraded = Some(Degraded::MissingInput {
                        field: sector.proxy.clone(),
                    });
                }
                let relative_strength = match (own, benchmark) {
                    (Some(own), Some(bench)) => own - bench,
                    _ => 0.0,
                };
                SectorScore {
                    name: sector.name.clone(),
                    proxy: sector.proxy.clone(),
                    leveraged: sector.leveraged.clone(),
                    relative_strength,
                    score: self.score(relative_strength),
                }
            })
            .collect();

        let strongest = scores
            .iter()
            .fold(None::<&SectorScore>, |best, s| match best {
                Some(b) if b.score >= s.score => Some(b),
                _ => Some(s),
            });

        Scored {
            value: SectorRotation {
                strongest: strongest.map(|s| s.name.clone()),
                recommended_etf: strongest.and_then(|s| s.leveraged.clone()),
                benchmark_return: benchmark.unwrap_or(0.0),
                sectors: scores,
            },
            degraded,
        }
    }

    fn score(&self, relative_strength: f64) -> i8 {
        if relative_strength > self.band {
            1
        } else if relative_strength < -self.band {
            -1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(start: f64, end: f64) -> Vec<f64> {
        // 10 closes, geometric path from start to end
        let step = (end / start).powf(1.0 / 9.0);
        (0..10).map(|i| start * step.powi(i)).collect()
    }

    #[test]
    fn test_relative_strength_scores() {
        let sectors = default_sectors();
        let spy = series(100.0, 101.0);
        let qqq = series(100.0, 105.0);
        let soxx = series(100.0, 101.5);
        let xbi = series(100.0, 97.0);

        let rotation = SectorRotationScorer::default()
            .evaluate(
                &spy,
                &[
                    (&sectors[0], qqq.as_slice()),
                    (&sectors[1], soxx.as_slice()),
                    (&sectors[2], xbi.as_slice()),
                ],
            )
            .value;

        assert_eq!(rotation.score_of("tech"), Some(1));
        assert_eq!(rotation.score_of("semi"), Some(0));
        assert_eq!(rotation.score_of("bio"), Some(-1));
        assert_eq!(rotation.strongest.as_deref(), Some("tech"));
        assert_eq!(rotation.recommended_etf.as_deref(), Some("TQQQ"));
        assert_eq!(rotation.score_for_etf("labu"), Some(-1));
        assert!((rotation.benchmark_return - 0.01).abs() < 1e-10);
    }

    #[test]
    fn test_ties_keep_configured_order() {
        let sectors = default_sectors();
        let flat = vec![100.0; 10];

        let rotation = SectorRotationScorer::default()
            .evaluate(
                &flat,
                &[(&sectors[0], flat.as_slice()), (&sectors[1], flat.as_slice())],
            )
            .value;

        assert_eq!(rotation.strongest.as_deref(), Some("tech"));
    }

    #[test]
    fn test_missing_benchmark_is_neutral() {
        let sectors = default_sectors();
        let soxx = series(100.0, 120.0);

        let scored = SectorRotationScorer::default().evaluate(&[], &[(&sectors[1], soxx.as_slice())]);

        assert!(scored.is_degraded());
        assert_eq!(scored.value.score_of("semi"), Some(0));
        assert_eq!(scored.value.strongest.as_deref(), Some("semi"));
    }

    #[test]
    fn test_no_sectors() {
        let scored = SectorRotationScorer::default().evaluate(&[100.0; 10], &[]);
        assert!(scored.value.strongest.is_none());
        assert!(scored.value.recommended_etf.is_none());
    }
}
