//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use signal_core::traits::{Indicator, MultiOutputIndicator};
use signal_indicators::{Ema, Macd, Rolling, Rsi, Sma};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn benchmark_moving_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_average");

    for size in [250, 1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("sma_partial", size), &data, |b, data| {
            let sma = Sma::new(20).min_periods(5);
            b.iter(|| sma.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("ema", size), &data, |b, data| {
            let ema = Ema::new(26);
            b.iter(|| ema.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_oscillators(c: &mut Criterion) {
    let mut group = c.benchmark_group("oscillators");

    for size in [250, 1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("rsi", size), &data, |b, data| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("macd", size), &data, |b, data| {
            let macd = Macd::new();
            b.iter(|| macd.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_rolling_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_median");

    for size in [250, 1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("window_20", size), &data, |b, data| {
            let rolling = Rolling::new(20, 1);
            b.iter(|| rolling.medians(black_box(data)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_moving_averages,
    benchmark_oscillators,
    benchmark_rolling_median
);
criterion_main!(benches);
