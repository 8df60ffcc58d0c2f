//! Criterion benchmarks for the indicator engine and the composer.
//!
//! Benchmarks:
//! 1. Each overlay indicator over a year and a decade of daily rows
//! 2. Full composition with every overlay active
//! 3. EMA-vs-SMA comparison figure

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stockdash_core::chart::{compose, compose_comparison, ChartKind, OverlayKind, OverlaySet};
use stockdash_core::domain::{PriceRow, PriceSeries};
use stockdash_core::indicators::{Bollinger, BollingerBand, Indicator, PivotPoint, Sma, Stochastic, Vwap};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize) -> PriceSeries {
    let base_date = chrono::NaiveDate::from_ymd_opt(2015, 1, 2).unwrap();
    let rows = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceRow {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect();
    PriceSeries::new("BENCH", rows).unwrap()
}

// ── 1. Indicators ────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(Sma::moving_average()),
        Box::new(Sma::ema_slot()),
        Box::new(Bollinger::overlay(BollingerBand::Upper)),
        Box::new(PivotPoint::all_levels().remove(0)),
        Box::new(Vwap::default()),
        Box::new(Stochastic),
    ];

    for n in [252usize, 2520] {
        let series = make_series(n);
        for ind in &indicators {
            group.bench_with_input(BenchmarkId::new(ind.name(), n), &series, |b, s| {
                b.iter(|| ind.series(black_box(s)))
            });
        }
    }
    group.finish();
}

// ── 2. Composition ───────────────────────────────────────────────────

fn bench_compose(c: &mut Criterion) {
    let series = make_series(252);
    let all: OverlaySet = OverlayKind::ALL.into_iter().collect();

    c.bench_function("compose_all_overlays_252", |b| {
        b.iter(|| compose(black_box(&series), ChartKind::Candlestick, &all))
    });
    c.bench_function("compose_comparison_252", |b| {
        b.iter(|| compose_comparison(black_box(&series)))
    });
}

criterion_group!(benches, bench_indicators, bench_compose);
criterion_main!(benches);
