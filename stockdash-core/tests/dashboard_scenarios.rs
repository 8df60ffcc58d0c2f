//! End-to-end dashboard scenarios through the reactor.
//!
//! Tests:
//! 1. 30 AAPL rows with the MA overlay compose to candlestick + "MA"
//! 2. An empty fetch for ZZZZ is reported while other tickers render
//! 3. Bollinger clicks toggle by parity
//! 4. Rows delivered out of order are plotted ascending
//! 5. The rule panel snapshot works off a resolved custom range

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use stockdash_core::chart::{ChartKind, OverlayKind, Trace};
use stockdash_core::data::{DataError, DataProvider, DataSource, FetchResult};
use stockdash_core::domain::PriceRow;
use stockdash_core::reactor::{Reactor, UiEvent};
use stockdash_core::rules::{MetricSnapshot, RuleMetric};
use stockdash_core::window::{TimeWindow, WindowResolver};
use stockdash_core::DashboardError;

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// Known closes 100, 101, ..., one row per day ending the day before `today`.
fn aapl_rows(n: usize) -> Vec<PriceRow> {
    let first = today() - Duration::days(n as i64);
    (0..n)
        .map(|i| {
            let close = 100.0 + i as f64;
            PriceRow {
                date: first + Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10_000 + i as u64,
            }
        })
        .collect()
}

/// Serves fixed rows per symbol, filtered to the requested range.
struct FixedProvider {
    rows: HashMap<String, Vec<PriceRow>>,
}

impl DataProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        let rows = self
            .rows
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .copied()
            .collect();
        Ok(FetchResult {
            symbol: symbol.to_string(),
            rows,
            source: DataSource::Synthetic,
        })
    }
}

fn reactor() -> Reactor {
    let mut rows = HashMap::new();
    rows.insert("AAPL".to_string(), aapl_rows(30));
    let mut reversed = aapl_rows(30);
    reversed.reverse();
    rows.insert("MSFT".to_string(), reversed);
    rows.insert("ZZZZ".to_string(), Vec::new());
    let resolver = WindowResolver::new(Arc::new(FixedProvider { rows })).with_today(today());
    Reactor::new(resolver)
}

fn select(list: &[&str]) -> UiEvent {
    UiEvent::TickersChanged(list.iter().map(|s| s.to_string()).collect())
}

// ──────────────────────────────────────────────
// Scenarios
// ──────────────────────────────────────────────

#[test]
fn aapl_thirty_rows_with_moving_average() {
    let mut r = reactor();
    r.handle(select(&["AAPL"]));
    let render = r.handle(UiEvent::OverlayButton(OverlayKind::MovingAverage));

    let charts = render.charts();
    assert_eq!(charts.len(), 1);
    let fig = charts[0].outcome.as_ref().unwrap();
    assert_eq!(fig.title, "AAPL");
    assert_eq!(fig.traces.len(), 2);
    assert!(matches!(fig.traces[0], Trace::Candlestick(_)));

    let Trace::Line(ma) = &fig.traces[1] else {
        panic!("expected MA line, got {:?}", fig.traces[1]);
    };
    assert_eq!(ma.name, "MA");
    assert_eq!(ma.y.len(), 30);
    assert!(ma.y[..4].iter().all(Option::is_none));
    // mean(100, 101, 102, 103, 104)
    assert!((ma.y[4].unwrap() - 102.0).abs() < 1e-10);
}

#[test]
fn empty_fetch_is_isolated_to_its_ticker() {
    let mut r = reactor();
    let render = r.handle(select(&["ZZZZ", "AAPL"]));
    let charts = render.charts();
    assert_eq!(charts.len(), 2);
    assert_eq!(charts[0].ticker, "ZZZZ");
    match &charts[0].outcome {
        Err(DashboardError::DataUnavailable { symbol, .. }) => assert_eq!(symbol, "ZZZZ"),
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
    assert!(charts[1].outcome.is_ok());
}

#[test]
fn unknown_symbol_is_data_unavailable() {
    let mut r = reactor();
    let render = r.handle(select(&["NOPE"]));
    let err = render.charts()[0].outcome.as_ref().unwrap_err();
    assert!(err.is_data_unavailable());
    assert!(err.to_string().contains("symbol not found"));
}

#[test]
fn bollinger_click_parity() {
    let mut r = reactor();
    r.handle(select(&["AAPL"]));
    let last = (0..3)
        .map(|_| r.handle(UiEvent::OverlayButton(OverlayKind::BollingerBands)))
        .last()
        .unwrap();
    // odd count: on
    let fig = last.charts()[0].outcome.as_ref().unwrap();
    assert_eq!(fig.trace_names(), vec!["candlestick", "BB_upper", "BB_mean", "BB_lower"]);

    // even count: off
    let render = r.handle(UiEvent::OverlayButton(OverlayKind::BollingerBands));
    let fig = render.charts()[0].outcome.as_ref().unwrap();
    assert_eq!(fig.trace_names(), vec!["candlestick"]);
    assert!(!r.state().overlays.contains(OverlayKind::BollingerBands));
}

#[test]
fn out_of_order_rows_are_plotted_ascending() {
    let mut r = reactor();
    r.handle(UiEvent::ChartButton(ChartKind::Line));
    let render = r.handle(select(&["MSFT"]));
    let Trace::Line(line) = &render.charts()[0].outcome.as_ref().unwrap().traces[0] else {
        panic!("expected line base trace");
    };
    assert!(line.x.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(line.y[0], Some(100.0));
}

#[test]
fn custom_range_narrows_series_and_feeds_snapshot() {
    let rows = aapl_rows(30);
    let start = rows[10].date;
    let end = rows[19].date;

    let mut r = reactor();
    r.handle(select(&["AAPL"]));
    let render = r.handle(UiEvent::CustomRange { start, end });
    let fig = render.charts()[0].outcome.as_ref().unwrap();
    assert_eq!(fig.traces[0].len(), 10);
    assert_eq!(r.state().window, TimeWindow::Range { start, end });

    let series = r
        .resolver()
        .resolve("AAPL", TimeWindow::Range { start, end })
        .unwrap();
    let snap = MetricSnapshot::compute(RuleMetric::MovingAverage, &series);
    // MA(5) over closes 110..=119 is 112..=117: mean 114.5
    let (upper, lower) = (snap.rows[0].1, snap.rows[1].1);
    assert!(((upper + lower) / 2.0 - 114.5).abs() < 1e-10);
}
