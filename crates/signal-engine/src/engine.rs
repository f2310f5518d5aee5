//! The signal combiner: per-symbol pipeline and batch orchestration.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use signal_core::error::{DataError, SignalError};
use signal_core::traits::{BaseScorer, FundamentalsSource, MarketData, ScoringInput, TextSource};
use signal_core::types::{BarSeries, CombinedSignal, Fundamentals, StrategyKind};
use signal_core::{Degraded, Scored};
use signal_risk::{FilterGate, FilterInput, RiskManager};
use signal_scoring::{CatalystScorer, SentimentAnalyzer, SpikeDetector, TechnicalScorer, VolumeAnomaly};
use signal_strategies::StrategyRegistry;
use tracing::{debug, error, info, warn};

use crate::combiner::{ComponentScores, SignalCombiner};
use crate::config::EngineConfig;
use crate::market::{MarketContext, MarketScorers, PriceBook};
use crate::report::SignalBatch;

/// The external data the engine reads. Nothing here is fetched by the engine
/// itself beyond these calls.
#[derive(Clone)]
pub struct Collaborators {
    pub market: Arc<dyn MarketData>,
    pub texts: Arc<dyn TextSource>,
    pub fundamentals: Arc<dyn FundamentalsSource>,
}

/// Computes [`CombinedSignal`]s for a strategy and a list of symbols.
///
/// The engine holds no state between calls; given the same collaborator data
/// and the same `now`, two calls produce the same rows.
pub struct SignalEngine {
    config: EngineConfig,
    sources: Collaborators,
    registry: StrategyRegistry,
    sentiment: SentimentAnalyzer,
    catalyst: CatalystScorer,
    technical: TechnicalScorer,
    volume: VolumeAnomaly,
    spikes: SpikeDetector,
    market: MarketScorers,
    gate: FilterGate,
    risk: RiskManager,
    timeout: Duration,
}

/// Per-batch pieces shared by every symbol.
struct BatchScope<'a> {
    kind: StrategyKind,
    scorer: &'a dyn BaseScorer,
    combiner: SignalCombiner,
    context: &'a MarketContext,
    now: DateTime<Utc>,
}

impl SignalEngine {
    pub fn new(config: EngineConfig, sources: Collaborators) -> Result<Self, SignalError> {
        config.validate()?;
        let registry = StrategyRegistry::new()?;
        let catalyst = CatalystScorer::new()
            .map_err(|e| SignalError::Internal(format!("catalyst patterns: {e}")))?;

        Ok(Self {
            registry,
            sentiment: SentimentAnalyzer::new(),
            catalyst,
            technical: TechnicalScorer::new(),
            volume: VolumeAnomaly::default(),
            spikes: SpikeDetector::default(),
            market: MarketScorers::new(&config.market),
            gate: FilterGate::new(config.filters.clone()),
            risk: RiskManager::new(&config.risk),
            timeout: Duration::from_millis(config.engine.provider_timeout_ms),
            config,
            sources,
        })
    }

    /// Compute signals as of the current instant.
    pub async fn compute_signals(
        &self,
        kind: StrategyKind,
        symbols: &[String],
    ) -> Result<SignalBatch, SignalError> {
        self.compute_signals_at(kind, symbols, Utc::now()).await
    }

    /// Compute one signal per requested symbol, in request order.
    ///
    /// The only error is a malformed request; every per-symbol failure
    /// becomes a zeroed HOLD row carrying the error message.
    pub async fn compute_signals_at(
        &self,
        kind: StrategyKind,
        symbols: &[String],
        now: DateTime<Utc>,
    ) -> Result<SignalBatch, SignalError> {
        let symbols = self.resolve_symbols(kind, symbols)?;
        let scorer = self.registry.create_default(kind)?;
        info!(strategy = %kind, symbols = symbols.len(), "computing signals");

        let mut degraded = Vec::new();
        degraded.extend(self.ensure_fresh_texts(now).await);
        let context = self.market_context().await;

        let scope = BatchScope {
            kind,
            scorer: scorer.as_ref(),
            combiner: SignalCombiner::for_strategy(
                kind,
                self.config.engine.strong_threshold,
                self.config.engine.weak_threshold,
            ),
            context: &context,
            now,
        };

        let signals: Vec<CombinedSignal> = stream::iter(symbols.iter())
            .map(|symbol| self.evaluate_guarded(symbol, &scope))
            .buffered(self.config.engine.max_concurrency.max(1))
            .collect()
            .await;

        let batch = SignalBatch::new(kind, now, signals, context, degraded);
        info!(
            strategy = %kind,
            run_id = %batch.run_id,
            counts = ?batch.action_counts(),
            "signals computed"
        );
        Ok(batch)
    }

    /// Normalise the request. An empty list means the default universe for
    /// strategies that have one.
    fn resolve_symbols(&self, kind: StrategyKind, symbols: &[String]) -> Result<Vec<String>, SignalError> {
        let mut resolved: Vec<String> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = symbol.trim().to_ascii_uppercase();
            if !symbol.is_empty() && !resolved.contains(&symbol) {
                resolved.push(symbol);
            }
        }
        if !resolved.is_empty() {
            return Ok(resolved);
        }
        if kind.requires_symbols() {
            return Err(SignalError::InvalidRequest(format!(
                "strategy {kind} requires at least one symbol"
            )));
        }
        Ok(self
            .config
            .engine
            .default_universe
            .iter()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect())
    }

    /// Ask ingestion to refresh the text dataset when it is missing or older
    /// than the configured age.
    async fn ensure_fresh_texts(&self, now: DateTime<Utc>) -> Option<Degraded> {
        let texts = &self.sources.texts;
        let last = tokio::time::timeout(self.timeout, texts.last_refreshed())
            .await
            .ok()
            .flatten();
        let max_age = chrono::Duration::minutes(self.config.engine.max_text_age_minutes);
        let stale = last.map_or(true, |at| now - at > max_age);
        if !stale {
            return None;
        }

        info!(last_refreshed = ?last, "text dataset stale, requesting refresh");
        self.soft(texts.name(), (), texts.refresh()).await.degraded
    }

    /// Fetch the market-wide series once and evaluate the shared context.
    async fn market_context(&self) -> MarketContext {
        let symbols = MarketScorers::symbols(&self.config.market);
        let market = &self.sources.market;
        let lookback = self.config.lookback_days;

        let fetched: Vec<(String, Scored<Vec<_>>)> = stream::iter(symbols)
            .map(|symbol| async move {
                let bars = self
                    .soft(market.name(), Vec::new(), market.price_history(&symbol, lookback))
                    .await;
                (symbol, bars)
            })
            .buffered(self.config.engine.max_concurrency.max(1))
            .collect()
            .await;

        let mut prices = PriceBook::new();
        let mut fetch_failures = Vec::new();
        for (symbol, scored) in fetched {
            let (bars, reason) = scored.into_parts();
            fetch_failures.extend(reason);
            prices.insert(symbol, bars);
        }

        let mut context = self.market.evaluate(&self.config.market, &prices);
        fetch_failures.append(&mut context.degraded);
        context.degraded = fetch_failures;
        debug!(
            macro_score = context.macro_signal.combined_score,
            strongest = ?context.sector_rotation.strongest,
            premium = context.etf_premium.average_signal,
            "market context evaluated"
        );
        context
    }

    /// Run one symbol, turning errors and panics into a failed row.
    async fn evaluate_guarded(&self, symbol: &str, scope: &BatchScope<'_>) -> CombinedSignal {
        match AssertUnwindSafe(self.evaluate(symbol, scope)).catch_unwind().await {
            Ok(Ok(signal)) => signal,
            Ok(Err(e)) => {
                warn!(symbol, error = %e, "symbol failed, emitting neutral row");
                CombinedSignal::failed(symbol, scope.kind, scope.now, e)
            }
            Err(_) => {
                error!(symbol, "symbol pipeline panicked, emitting neutral row");
                CombinedSignal::failed(symbol, scope.kind, scope.now, "internal error while scoring")
            }
        }
    }

    async fn evaluate(&self, symbol: &str, scope: &BatchScope<'_>) -> Result<CombinedSignal, SignalError> {
        let market = &self.sources.market;
        let texts = &self.sources.texts;
        let fundamentals = &self.sources.fundamentals;

        let (bars, records, fundamentals) = tokio::join!(
            self.soft(
                market.name(),
                Vec::new(),
                market.price_history(symbol, self.config.lookback_days)
            ),
            self.soft(
                texts.name(),
                Vec::new(),
                texts.recent_texts(symbol, self.config.text_limit)
            ),
            self.soft(
                fundamentals.name(),
                Fundamentals::default(),
                fundamentals.fundamentals(symbol)
            ),
        );

        let mut degraded = Vec::new();
        let (bars, reason) = bars.into_parts();
        degraded.extend(reason);
        let (records, reason) = records.into_parts();
        degraded.extend(reason);
        let (fundamentals, reason) = fundamentals.into_parts();
        degraded.extend(reason);

        let series = BarSeries::new(symbol, bars);
        let bodies: Vec<String> = records.into_iter().map(|r| r.text).collect();
        let sentiment = self.sentiment.mean_compound(&bodies);
        let catalyst_score = self.catalyst.score(&bodies);

        let base = if scope.scorer.is_warmed_up(series.len()) {
            scope.scorer.score(&ScoringInput {
                series: &series,
                sentiment,
                texts: &bodies,
            })
        } else {
            // An empty series is reported by the no-data filter instead
            if !series.is_empty() {
                degraded.push(Degraded::InsufficientData {
                    required: scope.scorer.warmup_period(),
                    available: series.len(),
                });
            }
            0.0
        };
        if !base.is_finite() {
            return Err(SignalError::Internal(format!(
                "{} produced a non-finite base score",
                scope.scorer.name()
            )));
        }

        let mut signal = CombinedSignal::neutral(symbol, scope.kind, scope.now);
        signal.strength = base;
        signal.sentiment_score = sentiment;
        signal.macro_score = scope.context.macro_signal.combined_score;
        signal.etf_premium_score = scope.context.etf_premium.score_for(symbol);
        signal.entry_price = series.last_close().filter(|c| c.is_finite()).unwrap_or(0.0);
        signal.meta.sector = fundamentals.sector.clone();
        signal.meta.last_earnings_date = fundamentals.last_earnings_date;
        signal.meta.catalyst_score = catalyst_score;
        signal.meta.sector_score = scope
            .context
            .sector_rotation
            .score_for_etf(symbol)
            .map(f64::from);

        let decision = self.gate.evaluate(&FilterInput {
            series: &series,
            fundamentals: &fundamentals,
            has_catalyst: catalyst_score > 0.0,
            today: scope.now.date_naive(),
        });
        if !decision.passed() {
            signal.meta.filters = decision.triggered;
            signal.meta.degraded = degraded;
            return Ok(signal);
        }

        let (reading, reason) = self.technical.score(&series.closes()).into_parts();
        degraded.extend(reason);
        let technical = reading.map_or(0.0, |r| r.strength);
        let volumes = series.volumes();
        let (volume, reason) = self.volume.strength(&volumes).into_parts();
        degraded.extend(reason);
        let spike = self.spikes.latest(&volumes);

        let blend = scope.combiner.blend(&ComponentScores {
            base,
            technical,
            volume,
            sentiment,
            macro_regime: signal.macro_score,
            etf_premium: signal.etf_premium_score,
        });
        let setup = self.risk.assess(&series);

        signal.technical_score = technical;
        signal.volume_score = volume;
        signal.enhanced_strength = blend.enhanced_strength;
        signal.action = blend.action;
        signal.confidence = blend.confidence;
        signal.entry_price = setup.entry_price;
        signal.risk_plan = setup.risk_plan;
        signal.position_size = setup.position_size;
        signal.atr = setup.atr;
        signal.meta.volume_spike_tier = spike.map(|s| s.tier);
        signal.meta.entry_triggers = reading.map_or(0, |r| r.entry_triggers());
        signal.meta.degraded = degraded;

        debug!(
            symbol,
            base,
            technical,
            volume,
            sentiment,
            triggers = signal.meta.entry_triggers,
            enhanced = signal.enhanced_strength,
            action = %signal.action,
            "symbol scored"
        );
        Ok(signal)
    }

    /// Await a collaborator call under the provider timeout, substituting
    /// `fallback` on error or timeout.
    async fn soft<T>(
        &self,
        source: &str,
        fallback: T,
        call: impl Future<Output = Result<T, DataError>>,
    ) -> Scored<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Scored::ok(value),
            Ok(Err(e)) => {
                warn!(source, error = %e, "collaborator call failed");
                Scored::degraded(
                    fallback,
                    Degraded::Upstream {
                        source: source.to_string(),
                        reason: e.to_string(),
                    },
                )
            }
            Err(_) => {
                let after_ms = self.timeout.as_millis() as u64;
                warn!(source, after_ms, "collaborator call timed out");
                Scored::degraded(
                    fallback,
                    Degraded::Timeout {
                        source: source.to_string(),
                        after_ms,
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use signal_core::types::{Action, Bar, FilterKind, TextOrigin, TextRecord};
    use signal_data::{StaticFundamentals, StaticMarketData, StaticTexts};

    const DAY_MS: i64 = 86_400_000;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 20, 0, 0).unwrap()
    }

    fn bars(closes: &[f64], volume: f64) -> Vec<Bar> {
        let start = now().timestamp_millis() - closes.len() as i64 * DAY_MS;
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + i as i64 * DAY_MS, c, c + 0.5, c - 0.5, c, volume))
            .collect()
    }

    fn zigzag(n: usize, start: f64) -> Vec<f64> {
        let mut price = start;
        (0..n)
            .map(|i| {
                price += if i % 2 == 0 { 2.0 } else { -1.0 };
                price
            })
            .collect()
    }

    fn engine_with(market: StaticMarketData, texts: StaticTexts, fundamentals: StaticFundamentals) -> SignalEngine {
        SignalEngine::new(
            EngineConfig::default(),
            Collaborators {
                market: Arc::new(market),
                texts: Arc::new(texts),
                fundamentals: Arc::new(fundamentals),
            },
        )
        .unwrap()
    }

    fn fresh_texts(records: Vec<TextRecord>) -> StaticTexts {
        StaticTexts::new(records).refreshed_at(now())
    }

    #[tokio::test]
    async fn test_smallcap_requires_symbols() {
        let engine = engine_with(StaticMarketData::new(), fresh_texts(vec![]), StaticFundamentals::new());

        let result = engine
            .compute_signals_at(StrategyKind::MomentumSmallcap, &[], now())
            .await;
        assert!(matches!(result, Err(SignalError::InvalidRequest(_))));

        let blank = engine
            .compute_signals_at(StrategyKind::MomentumSmallcap, &["  ".to_string()], now())
            .await;
        assert!(matches!(blank, Err(SignalError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_leveraged_etf_defaults_to_universe() {
        let engine = engine_with(StaticMarketData::new(), fresh_texts(vec![]), StaticFundamentals::new());

        let batch = engine
            .compute_signals_at(StrategyKind::LeveragedEtf, &[], now())
            .await
            .unwrap();
        let symbols: Vec<&str> = batch.signals.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TQQQ", "SOXL", "LABU"]);
        // No prices anywhere: every symbol is gated out
        assert!(batch
            .signals
            .iter()
            .all(|s| s.meta.filters == vec![FilterKind::NoData] && s.action == Action::Hold));
    }

    #[tokio::test]
    async fn test_penny_stock_is_gated() {
        let market = StaticMarketData::new().with_bars("PENY", bars(&[0.8; 40], 50_000_000.0));
        let engine = engine_with(market, fresh_texts(vec![]), StaticFundamentals::new());

        let batch = engine
            .compute_signals_at(StrategyKind::MomentumSmallcap, &["peny".to_string()], now())
            .await
            .unwrap();
        let signal = &batch.signals[0];

        assert_eq!(signal.action, Action::Hold);
        assert_eq!(signal.enhanced_strength, 0.0);
        assert_eq!(signal.confidence, 0.0);
        assert!(signal.risk_plan.is_none());
        assert!(signal.meta.filters.contains(&FilterKind::MinPrice));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_isolated() {
        let market = StaticMarketData::new()
            .with_bars("TQQQ", bars(&zigzag(60, 40.0), 2_000_000.0))
            .failing("SOXL");
        let engine = engine_with(market, fresh_texts(vec![]), StaticFundamentals::new());

        let batch = engine
            .compute_signals_at(
                StrategyKind::LeveragedEtf,
                &["TQQQ".to_string(), "SOXL".to_string()],
                now(),
            )
            .await
            .unwrap();

        let tqqq = batch.get("TQQQ").unwrap();
        assert!(tqqq.passed_filters());
        assert!(tqqq.risk_plan.is_some());

        let soxl = batch.get("SOXL").unwrap();
        assert_eq!(soxl.action, Action::Hold);
        assert_eq!(soxl.meta.filters, vec![FilterKind::NoData]);
        assert!(matches!(
            soxl.meta.degraded.first(),
            Some(Degraded::Upstream { .. })
        ));
    }

    #[tokio::test]
    async fn test_stale_texts_are_refreshed() {
        let texts = StaticTexts::new(vec![]).refreshed_at(now() - chrono::Duration::hours(2));
        let texts = Arc::new(texts);
        let engine = SignalEngine::new(
            EngineConfig::default(),
            Collaborators {
                market: Arc::new(StaticMarketData::new()),
                texts: texts.clone(),
                fundamentals: Arc::new(StaticFundamentals::new()),
            },
        )
        .unwrap();

        engine
            .compute_signals_at(StrategyKind::LeveragedEtf, &["TQQQ".to_string()], now())
            .await
            .unwrap();
        assert_eq!(texts.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn test_fresh_texts_are_not_refreshed() {
        let texts = Arc::new(fresh_texts(vec![]));
        let engine = SignalEngine::new(
            EngineConfig::default(),
            Collaborators {
                market: Arc::new(StaticMarketData::new()),
                texts: texts.clone(),
                fundamentals: Arc::new(StaticFundamentals::new()),
            },
        )
        .unwrap();

        engine
            .compute_signals_at(StrategyKind::LeveragedEtf, &["TQQQ".to_string()], now())
            .await
            .unwrap();
        assert_eq!(texts.refresh_calls(), 0);
    }

    struct SlowFundamentals;

    #[async_trait]
    impl FundamentalsSource for SlowFundamentals {
        async fn fundamentals(&self, _symbol: &str) -> Result<Fundamentals, DataError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Fundamentals {
                sector: Some("Biotechnology".into()),
                last_earnings_date: None,
            })
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_slow_collaborator_times_out() {
        let mut config = EngineConfig::default();
        config.engine.provider_timeout_ms = 50;
        let market = StaticMarketData::new().with_bars("TQQQ", bars(&zigzag(60, 40.0), 2_000_000.0));
        let engine = SignalEngine::new(
            config,
            Collaborators {
                market: Arc::new(market),
                texts: Arc::new(fresh_texts(vec![])),
                fundamentals: Arc::new(SlowFundamentals),
            },
        )
        .unwrap();

        let batch = engine
            .compute_signals_at(StrategyKind::LeveragedEtf, &["TQQQ".to_string()], now())
            .await
            .unwrap();
        let signal = &batch.signals[0];

        // Fundamentals fell back to empty, so the biotech gate never fired
        assert!(signal.passed_filters());
        assert!(signal
            .meta
            .degraded
            .iter()
            .any(|d| matches!(d, Degraded::Timeout { after_ms: 50, .. })));
    }

    #[tokio::test]
    async fn test_sentiment_and_catalyst_flow_through() {
        let market = StaticMarketData::new().with_bars("VRTX", bars(&zigzag(60, 40.0), 2_000_000.0));
        let texts = fresh_texts(vec![
            TextRecord::new(Some("VRTX".into()), now(), TextOrigin::News, "FDA approval granted, great news"),
            TextRecord::new(Some("VRTX".into()), now(), TextOrigin::Reddit, "love this stock"),
        ]);
        let fundamentals = StaticFundamentals::new().with(
            "VRTX",
            Fundamentals {
                sector: Some("Biotechnology".into()),
                last_earnings_date: None,
            },
        );
        let engine = engine_with(market, texts, fundamentals);

        let batch = engine
            .compute_signals_at(StrategyKind::MomentumSmallcap, &["VRTX".to_string()], now())
            .await
            .unwrap();
        let signal = &batch.signals[0];

        assert!(signal.sentiment_score > 0.0);
        assert!((signal.meta.catalyst_score - 0.5).abs() < 1e-10);
        // A catalyst lets a biotech name through the gate
        assert!(signal.passed_filters());
        assert_eq!(signal.meta.sector.as_deref(), Some("Biotechnology"));
    }

    #[tokio::test]
    async fn test_short_history_is_not_scored() {
        let market = StaticMarketData::new().with_bars("TQQQ", bars(&[40.0, 41.0, 42.0], 2_000_000.0));
        let engine = engine_with(market, fresh_texts(vec![]), StaticFundamentals::new());

        let batch = engine
            .compute_signals_at(StrategyKind::LeveragedEtf, &["TQQQ".to_string()], now())
            .await
            .unwrap();
        let signal = &batch.signals[0];

        assert_eq!(signal.strength, 0.0);
        assert!(signal
            .meta
            .degraded
            .iter()
            .any(|d| matches!(d, Degraded::InsufficientData { required: 5, available: 3 })));
    }

    #[tokio::test]
    async fn test_spike_and_triggers_reach_meta() {
        // Long slide into oversold, then a bounce on triple volume
        let mut closes: Vec<f64> = (0..30).map(|i| 120.0 - i as f64).collect();
        closes.push(closes[29] + 15.0);
        let mut history = bars(&closes, 1_000_000.0);
        if let Some(last) = history.last_mut() {
            last.volume = 3_000_000.0;
        }
        let market = StaticMarketData::new().with_bars("TQQQ", history);
        let engine = engine_with(market, fresh_texts(vec![]), StaticFundamentals::new());

        let batch = engine
            .compute_signals_at(StrategyKind::LeveragedEtf, &["TQQQ".to_string()], now())
            .await
            .unwrap();
        let signal = &batch.signals[0];

        assert!(signal.passed_filters());
        assert_eq!(signal.meta.volume_spike_tier, Some(3));
        assert!(signal.meta.entry_triggers >= 1);
        assert!(signal.volume_score > 0.0);
    }

    #[tokio::test]
    async fn test_idempotent_rows() {
        let market = StaticMarketData::new()
            .with_bars("TQQQ", bars(&zigzag(60, 40.0), 2_000_000.0))
            .with_bars("QQQ", bars(&zigzag(60, 300.0), 30_000_000.0));
        let engine = engine_with(market, fresh_texts(vec![]), StaticFundamentals::new());
        let symbols = vec!["TQQQ".to_string()];

        let first = engine
            .compute_signals_at(StrategyKind::LeveragedEtf, &symbols, now())
            .await
            .unwrap();
        let second = engine
            .compute_signals_at(StrategyKind::LeveragedEtf, &symbols, now())
            .await
            .unwrap();

        assert_eq!(first.signals, second.signals);
        assert_eq!(first.rows().unwrap(), second.rows().unwrap());
    }
}
